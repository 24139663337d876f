//! Filename convention for stored meter images.
//!
//! Convention: `meter-{unix_millis}-{hex8}.{ext}`, time-ordered with a
//! random suffix so two uploads in the same millisecond cannot collide.

/// File extension for a supported image content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Build a stored-image filename from a millisecond timestamp, a random
/// suffix, and the image content type.
pub fn stored_image_filename(unix_millis: i64, suffix: u32, content_type: &str) -> String {
    format!(
        "meter-{unix_millis}-{suffix:08x}.{}",
        extension_for(content_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_extension() {
        assert_eq!(
            stored_image_filename(1710497400123, 0xdeadbeef, "image/jpeg"),
            "meter-1710497400123-deadbeef.jpg"
        );
    }

    #[test]
    fn png_extension() {
        assert_eq!(
            stored_image_filename(1, 0, "image/png"),
            "meter-1-00000000.png"
        );
    }

    #[test]
    fn webp_extension() {
        assert_eq!(extension_for("image/webp"), "webp");
    }

    #[test]
    fn unknown_type_falls_back_to_bin() {
        assert_eq!(extension_for("application/octet-stream"), "bin");
    }

    #[test]
    fn suffix_is_zero_padded_hex() {
        assert_eq!(
            stored_image_filename(99, 0xff, "image/png"),
            "meter-99-000000ff.png"
        );
    }
}
