//! Activation state, persistence and module discovery for Tessera.
//!
//! This crate owns everything around the serial engine in
//! [`tessera_serial`]:
//! - The in-memory activation state (license holder, bound USB drive,
//!   per-module serial records)
//! - Persistence to a compressed, field-obfuscated state file under the
//!   per-user application-data directory
//! - Module discovery from per-module XML descriptors in the installation
//!   tree
//! - The hardware-identity seam (MAC address, USB drive serials)
//!
//! # Design Principles
//!
//! - **No ambient global**: the [`ActivationStore`] is constructed by the
//!   embedding application's composition root and passed by reference
//! - **Fail closed**: a missing, malformed or mismatched serial is
//!   `NotActivated`, never an error or a panic
//! - **Explicit corruption errors**: an absent state file is normal; a
//!   state file that exists but cannot be decoded is a distinguishable
//!   error, and saves are atomic so the previous file survives a crash
//! - **Tolerant of missing hardware**: an unreadable MAC or absent drive
//!   is an empty identity that fails the field check, not a fault

mod data;
mod discovery;
mod error;
mod hardware;
mod obfuscate;
mod store;

pub use data::{ActivationData, SerialModule};
pub use discovery::{DirectoryDiscovery, ModuleDescriptor, ModuleDiscovery};
pub use error::{Error, Result};
pub use hardware::{HardwareIdentity, SystemHardware};
pub use store::ActivationStore;
