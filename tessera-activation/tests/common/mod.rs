//! Shared test helpers for activation tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tessera_activation::{HardwareIdentity, ModuleDescriptor, ModuleDiscovery, Result};

pub const MAC: &str = "AA:BB:CC:DD:EE:FF";
pub const DRIVE_SERIAL: &str = "1C6F654E33B0";

/// Deterministic hardware identity for tests.
pub struct FakeHardware {
    pub mac: String,
    pub drive_serial: String,
}

impl FakeHardware {
    pub fn standard() -> Self {
        Self {
            mac: MAC.to_string(),
            drive_serial: DRIVE_SERIAL.to_string(),
        }
    }

    /// A machine with no readable identifiers.
    pub fn absent() -> Self {
        Self {
            mac: String::new(),
            drive_serial: String::new(),
        }
    }
}

impl HardwareIdentity for FakeHardware {
    fn mac_address(&self) -> String {
        self.mac.clone()
    }

    fn drive_serial(&self, _name: &str) -> String {
        self.drive_serial.clone()
    }
}

/// Discovery that yields nothing, for tests seeding modules by hand.
pub struct NoDiscovery;

impl ModuleDiscovery for NoDiscovery {
    fn discover(&self) -> Vec<Result<ModuleDescriptor>> {
        Vec::new()
    }
}

/// Writes a module descriptor into `<root>/<dir>/Menu/activation.xml`.
pub fn write_descriptor(root: &Path, dir: &str, xml: &str) {
    let menu = root.join(dir).join("Menu");
    fs::create_dir_all(&menu).unwrap();
    fs::write(menu.join("activation.xml"), xml).unwrap();
}
