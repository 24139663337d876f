//! Measure kinds, submission validation, and the duplicate-detection
//! month window.
//!
//! Pure domain logic. The repository queries and the HTTP layer both build
//! on the helpers here; none of them touch storage.

use chrono::{Datelike, TimeZone, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Upload constraints
// ---------------------------------------------------------------------------

/// Ceiling on a submitted meter image (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Accepted image content types for uploads.
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

// ---------------------------------------------------------------------------
// MeasureType
// ---------------------------------------------------------------------------

/// Kind of utility meter a reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureType {
    Water,
    Gas,
}

impl MeasureType {
    /// Parse user input case-insensitively, normalizing to the canonical
    /// uppercase kind.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match input.trim().to_ascii_uppercase().as_str() {
            "WATER" => Ok(Self::Water),
            "GAS" => Ok(Self::Gas),
            other => Err(CoreError::InvalidType(format!(
                "Invalid measure type '{other}'. Must be one of: WATER, GAS"
            ))),
        }
    }

    /// Canonical uppercase name, as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Water => "WATER",
            Self::Gas => "GAS",
        }
    }

    /// Lowercase name used when prompting the recognition provider.
    pub fn prompt_name(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Gas => "gas",
        }
    }
}

impl std::fmt::Display for MeasureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Submission validation
// ---------------------------------------------------------------------------

/// Validate that the customer code carries something.
pub fn validate_customer_code(code: &str) -> Result<(), CoreError> {
    if code.trim().is_empty() {
        return Err(CoreError::Validation(
            "customer_code must not be empty".into(),
        ));
    }
    Ok(())
}

/// Parse an RFC 3339 reading timestamp into UTC.
pub fn parse_measure_datetime(raw: &str) -> Result<Timestamp, CoreError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::Validation(format!("Invalid measure_datetime '{raw}': {e}")))
}

/// Validate an uploaded image: non-empty, under the size ceiling, declared
/// content type supported, and the declared type consistent with the actual
/// bytes (header-only sniff).
pub fn validate_image(declared_type: &str, bytes: &[u8]) -> Result<(), CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Validation("image must not be empty".into()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "image exceeds the {} MiB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    if !SUPPORTED_IMAGE_TYPES.contains(&declared_type) {
        return Err(CoreError::Validation(format!(
            "Invalid image type '{declared_type}'. Must be one of: {}",
            SUPPORTED_IMAGE_TYPES.join(", ")
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| CoreError::Validation("image bytes are not a recognized image format".into()))?;
    if format.to_mime_type() != declared_type {
        return Err(CoreError::Validation(format!(
            "image bytes ({}) do not match the declared content type '{declared_type}'",
            format.to_mime_type()
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Duplicate-detection month window
// ---------------------------------------------------------------------------

/// The half-open UTC range `[first instant of ts's month, first instant of
/// the next month)`.
///
/// Duplicate detection is defined over UTC calendar fields, not elapsed
/// time: day 1 and day 28 of the same month collide, the last day of one
/// month and the first day of the next do not.
pub fn month_window(ts: Timestamp) -> (Timestamp, Timestamp) {
    let (year, month) = (ts.year(), ts.month());
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("midnight on the 1st is unambiguous in UTC");
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .expect("midnight on the 1st is unambiguous in UTC");

    (start, end)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        parse_measure_datetime(s).unwrap()
    }

    // -- MeasureType ---------------------------------------------------------

    #[test]
    fn parse_accepts_canonical_kinds() {
        assert_eq!(MeasureType::parse("WATER").unwrap(), MeasureType::Water);
        assert_eq!(MeasureType::parse("GAS").unwrap(), MeasureType::Gas);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(MeasureType::parse("water").unwrap(), MeasureType::Water);
        assert_eq!(MeasureType::parse("Gas").unwrap(), MeasureType::Gas);
        assert_eq!(MeasureType::parse(" gAs ").unwrap(), MeasureType::Gas);
    }

    #[test]
    fn parse_rejects_unknown_kinds() {
        assert!(MeasureType::parse("electricity").is_err());
        assert!(MeasureType::parse("").is_err());
    }

    #[test]
    fn as_str_is_uppercase() {
        assert_eq!(MeasureType::Water.as_str(), "WATER");
        assert_eq!(MeasureType::Gas.as_str(), "GAS");
    }

    // -- Customer code -------------------------------------------------------

    #[test]
    fn customer_code_rejects_empty_and_blank() {
        assert!(validate_customer_code("").is_err());
        assert!(validate_customer_code("   ").is_err());
        assert!(validate_customer_code("C1").is_ok());
    }

    // -- Datetime ------------------------------------------------------------

    #[test]
    fn datetime_parses_rfc3339() {
        let dt = parse_measure_datetime("2024-03-15T10:00:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 15);
    }

    #[test]
    fn datetime_normalizes_offsets_to_utc() {
        let dt = parse_measure_datetime("2024-03-31T22:00:00-03:00").unwrap();
        // 22:00 UTC-3 is 01:00 UTC on April 1st.
        assert_eq!(dt.month(), 4);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn datetime_rejects_garbage() {
        assert!(parse_measure_datetime("yesterday").is_err());
        assert!(parse_measure_datetime("2024-13-01T00:00:00Z").is_err());
    }

    // -- Image validation ----------------------------------------------------

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn image_accepts_matching_png() {
        assert!(validate_image("image/png", PNG_MAGIC).is_ok());
    }

    #[test]
    fn image_accepts_matching_jpeg() {
        assert!(validate_image("image/jpeg", JPEG_MAGIC).is_ok());
    }

    #[test]
    fn image_rejects_empty() {
        assert!(validate_image("image/png", &[]).is_err());
    }

    #[test]
    fn image_rejects_oversized() {
        let huge = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(validate_image("image/png", &huge).is_err());
    }

    #[test]
    fn image_rejects_unsupported_declared_type() {
        assert!(validate_image("image/gif", PNG_MAGIC).is_err());
        assert!(validate_image("application/pdf", PNG_MAGIC).is_err());
    }

    #[test]
    fn image_rejects_declared_type_mismatching_bytes() {
        assert!(validate_image("image/jpeg", PNG_MAGIC).is_err());
    }

    #[test]
    fn image_rejects_unrecognizable_bytes() {
        assert!(validate_image("image/png", b"not an image at all").is_err());
    }

    // -- Month window --------------------------------------------------------

    #[test]
    fn window_covers_the_whole_month() {
        let (start, end) = month_window(ts("2024-03-15T10:00:00Z"));
        assert_eq!(start, ts("2024-03-01T00:00:00Z"));
        assert_eq!(end, ts("2024-04-01T00:00:00Z"));
    }

    #[test]
    fn day_one_and_day_twenty_eight_share_a_window() {
        let a = month_window(ts("2024-03-01T00:00:00Z"));
        let b = month_window(ts("2024-03-28T23:59:59Z"));
        assert_eq!(a, b);
    }

    #[test]
    fn adjacent_months_do_not_overlap() {
        let (_, march_end) = month_window(ts("2024-03-31T23:59:59Z"));
        let (april_start, _) = month_window(ts("2024-04-01T00:00:00Z"));
        assert_eq!(march_end, april_start);
    }

    #[test]
    fn december_rolls_into_january() {
        let (start, end) = month_window(ts("2023-12-31T12:00:00Z"));
        assert_eq!(start, ts("2023-12-01T00:00:00Z"));
        assert_eq!(end, ts("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn leap_february_is_one_window() {
        let a = month_window(ts("2024-02-01T00:00:00Z"));
        let b = month_window(ts("2024-02-29T23:59:59Z"));
        assert_eq!(a, b);
        assert_eq!(a.1, ts("2024-03-01T00:00:00Z"));
    }
}
