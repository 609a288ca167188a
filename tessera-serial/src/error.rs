//! Error types for serial encoding and composition.

use thiserror::Error;

/// Errors from the serial codecs and composer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A character outside the base-36 alphabet `A-Z0-9`.
    #[error("invalid base-36 symbol {0:?}")]
    InvalidSymbol(char),

    /// A character outside `0-9A-F` where a hex digit was expected.
    #[error("invalid hex digit {0:?}")]
    InvalidHexDigit(char),

    /// A base-36 value too large for `u64`.
    #[error("base-36 value overflows u64")]
    Overflow,

    /// An empty string where at least one base-36 symbol was expected.
    #[error("empty base-36 string")]
    Empty,

    /// An unknown serial-type flag name in a symbolic flag list.
    #[error("unknown serial type flag {0:?}")]
    UnknownFlag(String),

    /// The expiration flag is set but no expiration date was supplied.
    #[error("serial type requires an expiration date but none was given")]
    MissingExpiration,
}

/// Result type for serial operations.
pub type Result<T> = std::result::Result<T, Error>;
