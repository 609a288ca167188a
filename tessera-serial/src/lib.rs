//! Serial encoding, composition and validation for Tessera module activation.
//!
//! A serial is a dash-delimited string proving that one application module is
//! licensed under specific binding conditions. Every field is base-36 text
//! over the alphabet `A-Z0-9`:
//!
//! ```text
//! <app+module hash>-<field 1>-...-<field N>-<checksum>
//! ```
//!
//! Field 0 always hashes the application code concatenated with the module
//! code. Fields 1..N appear only for the flags set in the module's
//! [`SerialType`], in canonical order (license, MAC, expiration, pen drive,
//! trial). The final field is a checksum over the concatenation of all
//! preceding fields.
//!
//! # Design Principles
//!
//! - **Deterministic**: same inputs always produce the same serial, so
//!   serials issued offline validate on the target machine
//! - **Not cryptographic**: the encodings are reversible or weakly hashed
//!   by design; the checksum detects typos and casual tampering, nothing more
//! - **Compatibility first**: the hash multipliers and alphabet are fixed
//!   constants; changing them invalidates every serial already issued
//! - **Pure**: no IO, no clock reads — callers supply today's date and the
//!   machine identity to check against

mod codec;
mod compose;
mod error;
mod flags;
mod validate;

pub use codec::{
    decode_hex_digit, decode_int, encode_int, encode_mac, encode_serial_number, encode_text,
    fold_hex,
};
pub use compose::{compose, day_ordinal, SerialRequest, TRIAL_MARKER};
pub use error::{Error, Result};
pub use flags::SerialType;
pub use validate::{fields_match, is_well_formed, ActivationState, ExpectedFields};
