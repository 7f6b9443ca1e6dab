//! Typed response decoding.
//!
//! Pure, side-effect-free transformations from validated body bytes to a
//! caller-chosen representation. Decoding never mutates the response.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::DecodeError;
use crate::http::RawResponse;

/// The typed representation a caller wants extracted from response bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTarget {
    /// The body bytes unchanged.
    RawBytes,
    /// UTF-8 text. UTF-8 is the only text encoding supported; bytes in
    /// any other encoding fail with
    /// [`DecodeError::EncodingMismatch`](crate::error::DecodeError::EncodingMismatch).
    Text,
    /// Parsed JSON.
    Json,
    /// A recognized binary image format.
    Image,
}

/// A decoded response body.
#[derive(Debug, Clone)]
pub enum Decoded {
    Bytes(Bytes),
    Text(String),
    Json(serde_json::Value),
    Image(Image),
}

/// Image formats recognized by signature sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
    Tiff,
}

/// Image bytes tagged with their sniffed format. Pixel decoding is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct Image {
    pub format: ImageFormat,
    pub data: Bytes,
}

/// Decode `response` to `target`.
pub fn decode(response: &RawResponse, target: DecodeTarget) -> Result<Decoded, DecodeError> {
    let body = response.body();
    match target {
        DecodeTarget::RawBytes => Ok(Decoded::Bytes(body.clone())),
        DecodeTarget::Text => text(body).map(|s| Decoded::Text(s.to_owned())),
        DecodeTarget::Json => json::<serde_json::Value>(body).map(Decoded::Json),
        DecodeTarget::Image => image(body).map(Decoded::Image),
    }
}

/// Validate `body` as UTF-8 and borrow it as text.
pub fn text(body: &[u8]) -> Result<&str, DecodeError> {
    simdutf8::compat::from_utf8(body).map_err(|e| DecodeError::EncodingMismatch {
        valid_up_to: e.valid_up_to(),
    })
}

/// Parse `body` as JSON into any deserializable type.
pub fn json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(|e| DecodeError::MalformedJson {
        offset: byte_offset(body, &e),
        source: e,
    })
}

/// Sniff the image format of `body` from its signature.
pub fn image(body: &Bytes) -> Result<Image, DecodeError> {
    let format = sniff(body).ok_or(DecodeError::UnsupportedImageFormat)?;
    Ok(Image {
        format,
        data: body.clone(),
    })
}

/// Convert serde_json's 1-based line/column into a byte offset.
fn byte_offset(input: &[u8], err: &serde_json::Error) -> usize {
    let mut line = err.line();
    if line == 0 {
        return 0;
    }
    let mut start = 0usize;
    while line > 1 {
        match input[start..].iter().position(|&b| b == b'\n') {
            Some(i) => {
                start += i + 1;
                line -= 1;
            }
            None => break,
        }
    }
    (start + err.column().saturating_sub(1)).min(input.len())
}

fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::WebP)
    } else if bytes.starts_with(b"BM") {
        Some(ImageFormat::Bmp)
    } else if bytes.starts_with(b"II*\x00") || bytes.starts_with(b"MM\x00*") {
        Some(ImageFormat::Tiff)
    } else {
        None
    }
}
