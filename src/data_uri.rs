//! Data-URI encoding and decoding
//!
//! The storefront exchanges images as `data:<mime>;base64,<payload>`
//! strings. This module converts between that text form and raw bytes;
//! image decoding itself stays in the processor.

use crate::error::{RemovalError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// A decoded data URI: MIME type plus raw payload bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// MIME type from the URI header (e.g. `image/png`)
    pub mime: String,
    /// Decoded payload bytes
    pub bytes: Vec<u8>,
}

/// Encode bytes as a base64 data URI with the given MIME type
#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Decode a `data:<mime>;base64,<payload>` string
///
/// # Errors
/// Returns [`RemovalError::Decode`] when the scheme is not `data:`, the
/// header/payload separator is missing, the encoding is not base64, or the
/// payload is not valid base64.
pub fn decode(uri: &str) -> Result<DataUri> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RemovalError::decode("data URI must start with 'data:'"))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| RemovalError::decode("data URI missing ',' separator"))?;

    let mime = match header.strip_suffix(";base64") {
        Some(mime) => mime,
        None => {
            return Err(RemovalError::decode(format!(
                "unsupported data URI encoding in header '{}', only base64 is accepted",
                header
            )))
        },
    };

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| RemovalError::decode(format!("invalid base64 payload: {}", e)))?;

    Ok(DataUri {
        mime: if mime.is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime.to_string()
        },
        bytes,
    })
}
