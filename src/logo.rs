//! # Logo Ingestion
//!
//! Converts a user-selected image into a `data:` URL the designer can store
//! and hand to the renderer.
//!
//! Nothing here checks that the bytes are really an image: that is left to
//! the renderer, which skips logos it cannot decode.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::Path;

use crate::error::QrStyleError;

/// Encode raw bytes as `data:<mime>;base64,<payload>`.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read a file and encode it as a data URL, guessing the MIME type from
/// the file extension.
pub async fn read_data_url(path: impl AsRef<Path>) -> Result<String, QrStyleError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(encode_data_url(&bytes, mime.essence_str()))
}

/// Split a base64 data URL into its MIME type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), QrStyleError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| QrStyleError::Image("logo is not a data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| QrStyleError::Image("data URL has no payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| QrStyleError::Image("only base64 data URLs are supported".to_string()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| QrStyleError::Image(format!("invalid base64 in data URL: {}", e)))?;
    Ok((mime.to_string(), bytes))
}
