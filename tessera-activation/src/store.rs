//! The activation store: owns [`ActivationData`], persists it to disk, and
//! answers per-module activation queries.
//!
//! Persisted format: a versioned JSON record, gzip-compressed, written to
//! `key.bin` under a per-user application-data directory. Sensitive fields
//! pass through the reversible obfuscation transform before serialization.
//! Saves are atomic (temp file + rename) so a failed write never corrupts
//! the previous state file.

use crate::data::{ActivationData, SerialModule};
use crate::discovery::{ModuleDescriptor, ModuleDiscovery};
use crate::error::{Error, Result};
use crate::hardware::HardwareIdentity;
use crate::obfuscate::{conceal, reveal};
use chrono::NaiveDate;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tessera_serial::{
    compose, fields_match, is_well_formed, ActivationState, ExpectedFields, SerialRequest,
    SerialType,
};
use tracing::{debug, warn};

/// Name of the persisted state file.
const STATE_FILE: &str = "key.bin";

/// Current on-disk format version.
const STATE_VERSION: u32 = 1;

/// On-disk shape of the state record. String fields marked obfuscated hold
/// the concealed form.
#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    version: u32,
    /// Obfuscated.
    license: String,
    /// Obfuscated.
    pen_drive: String,
    modules: Vec<StoredModule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredModule {
    enabled: bool,
    /// Obfuscated.
    name: String,
    code: String,
    /// Symbolic flag list, validated on load.
    serial_type: String,
    expiration: Option<NaiveDate>,
    /// Obfuscated.
    serial_no: String,
    functionality: Vec<String>,
}

/// Owns the process's activation state. Constructed once by the embedding
/// application's composition root and passed by reference wherever
/// activation answers are needed; there is no ambient global.
#[derive(Debug)]
pub struct ActivationStore {
    /// Short application code hashed into field 0 of every serial.
    app_code: String,
    file_path: PathBuf,
    data: ActivationData,
}

impl ActivationStore {
    /// Creates a store persisting under the per-user application-data
    /// directory, in a folder named after the hosting application.
    /// `app_name` comes from the embedding application's own lookup; when
    /// absent, the current working directory's folder name stands in.
    pub fn new(app_code: impl Into<String>, app_name: Option<&str>) -> Result<Self> {
        let directory = match app_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fallback_app_name()?,
        };
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        let file_path = base.join(directory).join(STATE_FILE);
        Ok(Self::with_path(app_code, file_path))
    }

    /// Creates a store persisting to an explicit file path.
    #[must_use]
    pub fn with_path(app_code: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            app_code: app_code.into(),
            file_path,
            data: ActivationData::default(),
        }
    }

    /// The resolved state-file path.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read access to the whole state.
    #[must_use]
    pub fn data(&self) -> &ActivationData {
        &self.data
    }

    /// Sets the license holder's name.
    pub fn set_license(&mut self, license: impl Into<String>) {
        self.data.license = license.into();
    }

    /// Sets the bound USB drive's display name.
    pub fn set_pen_drive(&mut self, name: impl Into<String>) {
        self.data.pen_drive = name.into();
    }

    /// Inserts or replaces a module entry.
    pub fn upsert_module(&mut self, module: SerialModule) {
        self.data.upsert(module);
    }

    /// Drops every module entry.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Runs module discovery, then overlays persisted state if a state file
    /// exists. Returns `Ok(false)` when there is no file — the state keeps
    /// its defaults, which is not an error. A file that exists but cannot
    /// be decoded is a [`Error::CorruptState`] (or IO/version) error and
    /// leaves the in-memory state untouched.
    ///
    /// Descriptors are authoritative for a module's code, flags, expiration
    /// and functionality; a module already known keeps its serial. A
    /// descriptor that fails to parse is logged and skipped without
    /// aborting its siblings.
    pub fn load(&mut self, discovery: &dyn ModuleDiscovery) -> Result<bool> {
        for descriptor in discovery.discover() {
            match descriptor {
                Ok(d) => self.seed_module(d),
                Err(e) => warn!("skipping module descriptor: {e}"),
            }
        }

        if !self.file_path.exists() {
            debug!(path = %self.file_path.display(), "no activation state file");
            return Ok(false);
        }

        let stored = read_state(&self.file_path)?;
        self.merge_stored(stored)?;
        debug!(path = %self.file_path.display(), modules = self.data.modules().len(), "activation state loaded");
        Ok(true)
    }

    /// Serializes, compresses and atomically writes the current state,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let stored = StoredState {
            version: STATE_VERSION,
            license: conceal(&self.data.license),
            pen_drive: conceal(&self.data.pen_drive),
            modules: self
                .data
                .modules()
                .iter()
                .map(|m| StoredModule {
                    enabled: m.enabled,
                    name: conceal(&m.name),
                    code: m.code.clone(),
                    serial_type: m.serial_type.to_string(),
                    expiration: m.expiration,
                    serial_no: conceal(&m.serial_no),
                    functionality: m.functionality.clone(),
                })
                .collect(),
        };

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec(&stored)?;
        let tmp_path = self.file_path.with_extension("bin.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(&json)?;
            encoder.finish()?;
        }
        fs::rename(&tmp_path, &self.file_path)?;
        debug!(path = %self.file_path.display(), "activation state saved");
        Ok(())
    }

    /// Evaluates the named module's activation state, fresh on every call.
    /// The answer can change between calls when the clock or the attached
    /// hardware does.
    #[must_use]
    pub fn is_activated(&self, name: &str, hardware: &dyn HardwareIdentity) -> ActivationState {
        let Some(module) = self.data.module(name) else {
            return ActivationState::NotActivated;
        };
        if module.enabled {
            return ActivationState::NotActivated;
        }
        if !is_well_formed(&module.serial_no, &self.app_code, &module.code) {
            return ActivationState::NotActivated;
        }

        let mac = if module.serial_type.has_mac_address() {
            hardware.mac_address()
        } else {
            String::new()
        };
        let drive_serial = if module.serial_type.has_pen_drive() {
            Some(hardware.drive_serial(&self.data.pen_drive))
        } else {
            None
        };
        let expected = ExpectedFields {
            license: &self.data.license,
            mac_address: &mac,
            today: chrono::Local::now().date_naive(),
            pen_drive_serial: drive_serial.as_deref(),
        };
        if !fields_match(&module.serial_no, module.serial_type, &expected) {
            return ActivationState::NotActivated;
        }

        if module.serial_type.has_trial() {
            ActivationState::Trial
        } else {
            ActivationState::Activated
        }
    }

    /// Manufactures an activation serial for the named module from the
    /// current license, drive binding and hardware identity. Administrative
    /// path: the resulting string is handed to the end user out of band.
    pub fn issue_serial(&self, name: &str, hardware: &dyn HardwareIdentity) -> Result<String> {
        let module = self
            .data
            .module(name)
            .ok_or_else(|| Error::UnknownModule(name.to_string()))?;

        let mac = if module.serial_type.has_mac_address() {
            hardware.mac_address()
        } else {
            String::new()
        };
        let drive_serial = if module.serial_type.has_pen_drive() {
            hardware.drive_serial(&self.data.pen_drive)
        } else {
            String::new()
        };

        let serial = compose(&SerialRequest {
            license: &self.data.license,
            mac_address: &mac,
            app_code: &self.app_code,
            module_code: &module.code,
            serial_type: module.serial_type,
            expiration: module.expiration,
            pen_drive_serial: &drive_serial,
        })?;
        Ok(serial)
    }

    /// Records a serial the user entered for the named module. Rejects
    /// serials that are not well-formed or whose part count disagrees with
    /// the module's flag set.
    pub fn enter_serial(&mut self, name: &str, serial: &str) -> Result<()> {
        let app_code = self.app_code.clone();
        let module = self
            .data
            .module_mut(name)
            .ok_or_else(|| Error::UnknownModule(name.to_string()))?;

        let expected_parts = 2 + module.serial_type.field_count();
        if serial.split('-').count() != expected_parts
            || !is_well_formed(serial, &app_code, &module.code)
        {
            return Err(Error::InvalidSerial(name.to_string()));
        }
        module.serial_no = serial.to_string();
        Ok(())
    }

    /// Seeds or refreshes a module entry from its descriptor, keeping any
    /// serial already on file.
    fn seed_module(&mut self, descriptor: ModuleDescriptor) {
        let serial_no = self
            .data
            .module(&descriptor.name)
            .map(|m| m.serial_no.clone())
            .unwrap_or_default();
        self.data.upsert(SerialModule {
            enabled: false,
            name: descriptor.name,
            code: descriptor.code,
            serial_type: descriptor.serial_type,
            expiration: descriptor.expiration,
            serial_no,
            functionality: descriptor.functionality,
        });
    }

    /// Reverses the obfuscation transform and merges a decoded state file
    /// over the discovered modules: license and drive binding replace,
    /// per-module serials overlay by name, unknown persisted modules are
    /// appended.
    fn merge_stored(&mut self, stored: StoredState) -> Result<()> {
        if stored.version != STATE_VERSION {
            return Err(Error::UnsupportedVersion(stored.version));
        }

        self.data.license = reveal(&stored.license)?;
        self.data.pen_drive = reveal(&stored.pen_drive)?;

        for sm in stored.modules {
            let name = reveal(&sm.name)?;
            let serial_no = reveal(&sm.serial_no)?;
            let serial_type = SerialType::parse(&sm.serial_type)
                .map_err(|e| Error::CorruptState(format!("module {name:?}: {e}")))?;

            match self.data.module_mut(&name) {
                Some(module) => module.serial_no = serial_no,
                None => self.data.upsert(SerialModule {
                    enabled: sm.enabled,
                    name,
                    code: sm.code,
                    serial_type,
                    expiration: sm.expiration,
                    serial_no,
                    functionality: sm.functionality,
                }),
            }
        }
        Ok(())
    }
}

/// Decompresses and parses the state file. Every decode failure maps to
/// [`Error::CorruptState`] so callers can tell a damaged file from an
/// absent one.
fn read_state(path: &Path) -> Result<StoredState> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(file);
    let mut json = Vec::new();
    decoder
        .read_to_end(&mut json)
        .map_err(|e| Error::CorruptState(format!("decompression: {e}")))?;
    serde_json::from_slice(&json).map_err(|e| Error::CorruptState(format!("state record: {e}")))
}

/// Stand-in application name: the current working directory's folder name.
fn fallback_app_name() -> Result<String> {
    let cwd = std::env::current_dir()?;
    Ok(cwd
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tessera".to_string()))
}
