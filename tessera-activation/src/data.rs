//! In-memory activation state.

use chrono::NaiveDate;
use tessera_serial::SerialType;

/// One licensable module and the activation serial currently on file for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialModule {
    /// Administrative kill switch; an enabled module is deliberately never
    /// evaluated as activated.
    pub enabled: bool,
    /// Unique display name, the lookup key.
    pub name: String,
    /// Short module identifier embedded in every serial.
    pub code: String,
    /// Which binding fields this module's serials must carry.
    pub serial_type: SerialType,
    /// Expiration date, present when the expiration flag is set.
    pub expiration: Option<NaiveDate>,
    /// The activation serial on file, empty until the user enters one.
    pub serial_no: String,
    /// Feature identifiers granted by the module descriptor, in descriptor
    /// order.
    pub functionality: Vec<String>,
}

/// Process-wide activation state: the license holder, the bound USB drive,
/// and every known module.
///
/// Created empty, populated by discovery and by loading persisted state,
/// replaced or cleared whole — never partially destroyed. Not internally
/// synchronized: callers using it from several threads must serialize
/// access themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationData {
    /// License holder's name.
    pub license: String,
    /// Display name of the bound USB drive, empty when no drive binding is
    /// in use.
    pub pen_drive: String,
    modules: Vec<SerialModule>,
}

impl ActivationData {
    /// Returns the modules in insertion order.
    #[must_use]
    pub fn modules(&self) -> &[SerialModule] {
        &self.modules
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&SerialModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Mutable lookup by name.
    pub fn module_mut(&mut self, name: &str) -> Option<&mut SerialModule> {
        self.modules.iter_mut().find(|m| m.name == name)
    }

    /// Inserts a module, replacing any existing entry with the same name.
    /// Keeps the list unique by name.
    pub fn upsert(&mut self, module: SerialModule) {
        match self.module_mut(&module.name) {
            Some(existing) => *existing = module,
            None => self.modules.push(module),
        }
    }

    /// Drops every module. License and pen-drive name are untouched.
    pub fn clear(&mut self) {
        self.modules.clear();
    }
}
