//! Deterministic base-36 codecs used by every serial field.
//!
//! All encoders render through the same 36-symbol alphabet (`A-Z` then
//! `0-9`). Two multipliers are deliberately small and must never change:
//! `2` for the text hash and `4` for the MAC fold. They interoperate with
//! every serial already issued by the existing installations, so dispersion
//! quality is a non-goal here.

use crate::error::{Error, Result};

/// The base-36 alphabet. Letters before digits, so `0` has value 26.
const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const BASE: u64 = ALPHABET.len() as u64;

/// Multiplier for the rolling text hash.
const TEXT_FOLD: u64 = 2;

/// Multiplier for folding MAC-address hex pairs.
const MAC_FOLD: u64 = 4;

/// Hashes `text` into a base-36 string.
///
/// Rolling hash: `value = value * 2 + code_point`, wrapping on overflow.
/// One-way — only the accumulated integer survives, never the text.
/// The empty string hashes to 0 and renders as `"A"`.
#[must_use]
pub fn encode_text(text: &str) -> String {
    let mut value: u64 = 0;
    for ch in text.chars() {
        value = value.wrapping_mul(TEXT_FOLD).wrapping_add(ch as u64);
    }
    encode_int(value)
}

/// Renders `value` in base-36, most-significant symbol first.
#[must_use]
pub fn encode_int(mut value: u64) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(ALPHABET[(value % BASE) as usize] as char);
        value /= BASE;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}

/// Parses a base-36 string back into the integer it encodes.
///
/// # Errors
///
/// Returns an error for an empty string, a symbol outside the alphabet, or
/// a value that does not fit in `u64`.
pub fn decode_int(text: &str) -> Result<u64> {
    if text.is_empty() {
        return Err(Error::Empty);
    }
    let mut value: u64 = 0;
    for ch in text.chars() {
        let digit = ALPHABET
            .iter()
            .position(|&b| b as char == ch)
            .ok_or(Error::InvalidSymbol(ch))? as u64;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(Error::Overflow)?;
    }
    Ok(value)
}

/// Decodes one uppercase hex digit (`0-9A-F`).
pub fn decode_hex_digit(ch: char) -> Result<u64> {
    match ch {
        '0'..='9' => Ok(ch as u64 - '0' as u64),
        'A'..='F' => Ok(ch as u64 - 'A' as u64 + 10),
        _ => Err(Error::InvalidHexDigit(ch)),
    }
}

/// Folds an uppercase hex string into a running integer, wrapping on
/// overflow. The empty string folds to 0.
pub fn fold_hex(hex: &str) -> Result<u64> {
    let mut value: u64 = 0;
    for ch in hex.chars() {
        value = value.wrapping_mul(16).wrapping_add(decode_hex_digit(ch)?);
    }
    Ok(value)
}

/// Canonicalizes a colon-separated MAC address into one base-36 string.
///
/// Each hex pair is folded into a running value with multiplier 4. An empty
/// string encodes as `"A"` — an absent hardware identity must flow through
/// to a failed comparison, not a fault.
pub fn encode_mac(mac: &str) -> Result<String> {
    let mut value: u64 = 0;
    for pair in mac.split(':') {
        value = value.wrapping_mul(MAC_FOLD).wrapping_add(fold_hex(pair)?);
    }
    Ok(encode_int(value))
}

/// Encodes an arbitrary hex string (a USB drive hardware serial) into
/// base-36.
pub fn encode_serial_number(hex: &str) -> Result<String> {
    Ok(encode_int(fold_hex(hex)?))
}
