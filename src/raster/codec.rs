//! Serialized signature codec: PNG bytes wrapped in a base64 data URL.
//!
//! The single string that crosses the controller boundary is either empty
//! ("no signature") or `data:image/png;base64,<payload>`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbaImage;

use crate::error::{Error, Result};

/// Prefix carried by every non-empty serialized signature.
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Wrap PNG bytes into a data URL string.
pub fn encode_data_url(png: &[u8]) -> String {
    format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(png))
}

/// Decode a serialized signature back into a bitmap.
///
/// Accepts the canonical data URL form; a bare base64 PNG payload is also
/// tolerated since some hosts strip the prefix in transit. Empty input is
/// a caller error here; the controller never asks to decode "".
pub fn decode_data_url(value: &str) -> Result<RgbaImage> {
    if value.is_empty() {
        return Err(Error::DecodeError("empty value".into()));
    }
    let payload = value.strip_prefix(DATA_URL_PREFIX).unwrap_or(value);
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::DecodeError(format!("invalid base64: {}", e)))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| Error::DecodeError(format!("invalid image data: {}", e)))?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_fixture(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([12, 34, 56, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn encode_then_decode_preserves_pixels() {
        let png = png_fixture(5, 3);
        let url = encode_data_url(&png);
        assert!(url.starts_with(DATA_URL_PREFIX));
        let img = decode_data_url(&url).expect("decode");
        assert_eq!(img.width(), 5);
        assert_eq!(img.height(), 3);
        assert_eq!(img.get_pixel(2, 1).0, [12, 34, 56, 255]);
    }

    #[test]
    fn decode_accepts_bare_base64() {
        let png = png_fixture(2, 2);
        let bare = STANDARD.encode(&png);
        assert!(decode_data_url(&bare).is_ok());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_data_url("").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!not-base64!!!").is_err());
        // Valid base64, but not an image
        let not_png = STANDARD.encode(b"hello world");
        assert!(decode_data_url(&not_png).is_err());
    }
}
