//! Numeric-token extraction from the recognition provider's free text.
//!
//! The provider answers in prose ("O consumo de água na imagem é de
//! 00002.21 m³."). The reading is the first run of digits, optionally with
//! a decimal fraction. Finding no token at all is the caller's error case,
//! never a silent zero.

use std::sync::LazyLock;

use regex::Regex;

/// First run of digits, optionally followed by a decimal fraction.
static NUMERIC_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// Extract the consumption value from provider free text.
///
/// Returns `None` when the text contains no numeric token. Values are
/// normalized to the storage policy via [`round_to_hundredths`].
pub fn parse_consumption(text: &str) -> Option<f64> {
    let token = NUMERIC_TOKEN_RE.find(text)?;
    let value: f64 = token.as_str().parse().ok()?;
    Some(round_to_hundredths(value))
}

/// Round to two fraction digits, the precision `measure_value` is stored
/// and compared at.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_with_leading_zeros() {
        let text = "O consumo de água na imagem é de 00002.21 m³.";
        assert_eq!(parse_consumption(text), Some(2.21));
    }

    #[test]
    fn parses_bare_integer() {
        assert_eq!(parse_consumption("Reading: 1234 units"), Some(1234.0));
    }

    #[test]
    fn parses_decimal_mid_sentence() {
        let text = "The gas meter shows roughly 15.7 cubic meters consumed.";
        assert_eq!(parse_consumption(text), Some(15.7));
    }

    #[test]
    fn takes_the_first_token() {
        // The rule is positional: the first digit run wins, even when a
        // later one looks more like a reading.
        assert_eq!(parse_consumption("2 meters show 15.5"), Some(2.0));
    }

    #[test]
    fn no_digits_is_none() {
        assert_eq!(parse_consumption("the dial is unreadable"), None);
        assert_eq!(parse_consumption(""), None);
    }

    #[test]
    fn trailing_dot_is_not_a_fraction() {
        assert_eq!(parse_consumption("value is 42."), Some(42.0));
    }

    #[test]
    fn rounding_clamps_to_two_digits() {
        assert_eq!(round_to_hundredths(2.219), 2.22);
        assert_eq!(round_to_hundredths(2.214), 2.21);
        assert_eq!(round_to_hundredths(1234.0), 1234.0);
    }

    #[test]
    fn long_fraction_is_normalized() {
        assert_eq!(parse_consumption("shows 3.14159"), Some(3.14));
    }
}
