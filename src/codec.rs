//! Media codec for image payloads
//!
//! This module converts local image files to base64 payloads suitable for
//! JSON request bodies, and builds displayable `data:` URIs from payloads
//! returned by the gateway. Encoding touches the filesystem; everything
//! else is pure string work.

use crate::error::{MdchatError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;

/// Encode a local image file as a base64 payload
///
/// Reads the file and returns its bytes base64-encoded. If the file itself
/// contains a textual data URI (some tools export images that way), the
/// prefix is stripped and the embedded payload is returned as-is.
///
/// # Arguments
///
/// * `path` - Path to the image file
///
/// # Errors
///
/// Returns `MdchatError::Codec` if the file cannot be read
pub fn encode(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        MdchatError::Codec(format!("failed to read {}: {}", path.display(), e))
    })?;

    if let Ok(text) = std::str::from_utf8(&bytes) {
        if let Some(payload) = strip_data_uri(text.trim()) {
            return Ok(payload.to_string());
        }
    }

    Ok(BASE64.encode(&bytes))
}

/// Build a displayable data URI from a MIME type and base64 payload
///
/// Pure and total; performs no validation of the payload.
///
/// # Examples
///
/// ```
/// use mdchat::codec::to_data_uri;
///
/// let uri = to_data_uri("image/png", "aGVsbG8=");
/// assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
/// ```
pub fn to_data_uri(mime: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime, payload)
}

/// Strip a `data:{mime};base64,` prefix, returning the bare payload
///
/// Returns `None` if the string is not a base64 data URI.
pub fn strip_data_uri(s: &str) -> Option<&str> {
    let rest = s.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    Some(payload)
}

/// Split a data URI into its MIME type and decoded bytes
///
/// Used when saving gateway-generated images to disk.
///
/// # Errors
///
/// Returns `MdchatError::Codec` if the URI is malformed or the payload is
/// not valid base64
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| MdchatError::Codec(format!("not a data URI: {}", truncate(uri, 40))))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| MdchatError::Codec("data URI is not base64-encoded".to_string()))?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| MdchatError::Codec(format!("invalid base64 payload: {}", e)))?;
    Ok((mime.to_string(), bytes))
}

/// Guess the MIME type of an image file from its extension
///
/// Falls back to `application/octet-stream` for unrecognized extensions;
/// the gateway accepts the payload either way.
pub fn mime_for_path(path: &Path) -> String {
    match image::ImageFormat::from_path(path) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) => "application/octet-stream".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        // Back up to a char boundary so multibyte input cannot panic
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &s[..cut])
    }
}
