// src/utils/data_uri.rs

//! Conversion between `data:image/<subtype>;base64,<payload>` strings and raw
//! image bytes.
//!
//! Parsing runs the checks in a fixed order so callers get a stable error
//! for a given input: prefix, subtype extraction, subtype whitelist, base64
//! decoding, then magic-byte sniffing of the decoded payload.

use std::sync::LazyLock;

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose},
};
use regex::Regex;

use crate::error::AppError;

/// Image subtypes accepted for question payloads.
pub const ALLOWED_SUBTYPES: [&str; 2] = ["jpeg", "png"];

const DATA_URI_PREFIX: &str = "data:image/";

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

static SUBTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/([a-zA-Z]*);base64,").expect("subtype pattern is valid")
});

/// Clients are not consistent about trailing `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A validated image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Lowercase subtype, one of [`ALLOWED_SUBTYPES`].
    pub subtype: String,
    pub bytes: Vec<u8>,
}

/// Parses and validates an image data URI.
///
/// # Errors
///
/// * `AppError::Format` - missing `data:image/` prefix, no extractable
///   subtype, invalid base64, or bytes that are not the declared image type.
/// * `AppError::UnsupportedType` - subtype other than jpeg or png.
pub fn parse_image_data_uri(uri: &str) -> Result<DecodedImage, AppError> {
    if !uri.starts_with(DATA_URI_PREFIX) {
        return Err(AppError::Format("Invalid image format".to_string()));
    }

    let captures = SUBTYPE_RE
        .captures(uri)
        .ok_or_else(|| AppError::Format("Unable to extract image type".to_string()))?;

    let subtype = captures[1].to_string();
    if !ALLOWED_SUBTYPES.contains(&subtype.as_str()) {
        return Err(AppError::UnsupportedType(subtype));
    }

    let header_len = captures[0].len();
    let payload: String = uri[header_len..]
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = LENIENT_BASE64
        .decode(payload.as_bytes())
        .map_err(|e| AppError::Format(format!("Invalid base64 image payload: {}", e)))?;

    match sniff_image_subtype(&bytes) {
        Some(sniffed) if sniffed == subtype => Ok(DecodedImage { subtype, bytes }),
        Some(sniffed) => Err(AppError::Format(format!(
            "Image declared as {} but contains {} data",
            subtype, sniffed
        ))),
        None => Err(AppError::Format(format!(
            "Image payload is not valid {} data",
            subtype
        ))),
    }
}

/// Identifies a JPEG or PNG stream by its leading magic bytes.
pub fn sniff_image_subtype(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG_MAGIC) {
        Some("png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("jpeg")
    } else {
        None
    }
}

/// Builds `data:image/<subtype>;base64,<payload>`.
pub fn encode_image_data_uri(subtype: &str, bytes: &[u8]) -> String {
    format!(
        "{}{};base64,{}",
        DATA_URI_PREFIX,
        subtype,
        general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(b"\0\0\0\rIHDR rest of image");
        bytes
    }

    fn jpeg_bytes() -> Vec<u8> {
        let mut bytes = JPEG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']);
        bytes
    }

    #[test]
    fn parses_png_uri() {
        let uri = encode_image_data_uri("png", &png_bytes());
        let image = parse_image_data_uri(&uri).unwrap();
        assert_eq!(image.subtype, "png");
        assert_eq!(image.bytes, png_bytes());
    }

    #[test]
    fn accepts_missing_padding_and_line_breaks() {
        let encoded = general_purpose::STANDARD_NO_PAD.encode(jpeg_bytes());
        let (head, tail) = encoded.split_at(4);
        let uri = format!("data:image/jpeg;base64,{}\n{}", head, tail);
        let image = parse_image_data_uri(&uri).unwrap();
        assert_eq!(image.bytes, jpeg_bytes());
    }

    #[test]
    fn rejects_non_image_prefix() {
        let err = parse_image_data_uri("data:text/plain;base64,aGVsbG8=").unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[test]
    fn rejects_uri_without_base64_marker() {
        let err = parse_image_data_uri("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, AppError::Format(msg) if msg == "Unable to extract image type"));
    }

    #[test]
    fn rejects_gif_as_unsupported() {
        let err = parse_image_data_uri("data:image/gif;base64,R0lGODlhAQABAAAAACw=").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedType(t) if t == "gif"));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = parse_image_data_uri("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[test]
    fn rejects_bytes_that_do_not_match_declared_type() {
        let uri = encode_image_data_uri("png", &jpeg_bytes());
        let err = parse_image_data_uri(&uri).unwrap_err();
        assert!(matches!(err, AppError::Format(_)));

        let uri = encode_image_data_uri("jpeg", b"plain text");
        assert!(matches!(
            parse_image_data_uri(&uri).unwrap_err(),
            AppError::Format(_)
        ));
    }

    #[test]
    fn sniffing() {
        assert_eq!(sniff_image_subtype(&png_bytes()), Some("png"));
        assert_eq!(sniff_image_subtype(&jpeg_bytes()), Some("jpeg"));
        assert_eq!(sniff_image_subtype(b"GIF89a"), None);
        assert_eq!(sniff_image_subtype(&[]), None);
    }
}
