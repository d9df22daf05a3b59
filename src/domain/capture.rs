//! Browser face captures arrive as `data:image/<ext>;base64,<payload>` URLs.

use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::STANDARD};
use regex::Regex;

static DATA_URL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/(png|jpeg|jpg|webp);base64$").expect("valid data url regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceCapture {
    /// File extension, `jpeg` normalised to `jpg`.
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Decodes a capture; `None` for anything that is not a base64 png/jpeg/webp data URL.
pub fn decode_data_url(data_url: &str) -> Option<FaceCapture> {
    let (header, encoded) = data_url.trim().split_once(',')?;
    let captures = DATA_URL_HEADER.captures(header)?;
    let extension = match captures.get(1)?.as_str() {
        "png" => "png",
        "webp" => "webp",
        _ => "jpg",
    };
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    if bytes.is_empty() {
        return None;
    }
    Some(FaceCapture { extension, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_capture() {
        let capture = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(capture.extension, "png");
        assert_eq!(capture.bytes, b"hello");
    }

    #[test]
    fn jpeg_becomes_jpg() {
        let capture = decode_data_url("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(capture.extension, "jpg");
    }

    #[test]
    fn rejects_other_payloads() {
        assert!(decode_data_url("").is_none());
        assert!(decode_data_url("data:image/gif;base64,aGVsbG8=").is_none());
        assert!(decode_data_url("data:text/plain;base64,aGVsbG8=").is_none());
        assert!(decode_data_url("data:image/png;base64,@@@").is_none());
        assert!(decode_data_url("data:image/png;base64").is_none());
    }
}
