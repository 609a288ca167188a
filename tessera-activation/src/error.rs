//! Error types for the activation store and module discovery.

use std::path::PathBuf;
use thiserror::Error;

/// Activation-specific errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure reading or writing activation state.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial encoding or composition failure.
    #[error("serial error: {0}")]
    Serial(#[from] tessera_serial::Error),

    /// State-record serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persisted state file exists but cannot be decoded. Distinct from
    /// an absent file, which is not an error.
    #[error("corrupt activation state: {0}")]
    CorruptState(String),

    /// The persisted state file was written by an unknown format version.
    #[error("unsupported activation state version {0}")]
    UnsupportedVersion(u32),

    /// A module descriptor could not be read or parsed. Discovery of other
    /// modules continues past this.
    #[error("bad module descriptor {path}: {reason}")]
    Descriptor {
        /// Path of the offending descriptor file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// No module with the given name is on file.
    #[error("unknown module {0:?}")]
    UnknownModule(String),

    /// A serial entered for a module failed well-formedness or does not
    /// have the part count its flag set demands.
    #[error("invalid serial for module {0:?}")]
    InvalidSerial(String),
}

/// Result type for activation operations.
pub type Result<T> = std::result::Result<T, Error>;
