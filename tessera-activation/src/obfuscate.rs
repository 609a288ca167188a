//! The storage-time field obfuscation transform.
//!
//! A reversible Base64 pass over sensitive fields (license, drive name,
//! module names and serials) before they hit disk. Deliberately not
//! encryption, and distinct from the one-way serial hash; it only keeps
//! the values out of casual view in the state file.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Forward transform, applied on save. Empty stays empty.
pub(crate) fn conceal(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    BASE64.encode(text.as_bytes())
}

/// Inverse transform, applied on load.
///
/// # Errors
///
/// A field that is not valid Base64 or does not decode to UTF-8 marks the
/// whole state file as corrupt.
pub(crate) fn reveal(text: &str) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let bytes = BASE64
        .decode(text)
        .map_err(|e| Error::CorruptState(format!("obfuscated field: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::CorruptState(format!("obfuscated field: {e}")))
}
