//! Module discovery from per-module descriptor files.
//!
//! Each installed module ships a descriptor under its `Menu` subdirectory:
//!
//! ```xml
//! <module name="Sales" code="SAL" serialType="LICENSE_NAME, TRIAL">
//!     <functionality>invoicing</functionality>
//!     <functionality>quotes</functionality>
//! </module>
//! ```
//!
//! `serialType` is the symbolic flag list understood by
//! [`SerialType::parse`]; `expirationDate` (ISO `YYYY-MM-DD`) is required
//! exactly when the expiration flag is set. A descriptor that fails to parse
//! yields an error for that module only — sibling modules still discover.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tessera_serial::SerialType;

/// Descriptor file name. Release installations ship the descriptor under an
/// alternate extension.
#[cfg(debug_assertions)]
const DESCRIPTOR_FILE: &str = "activation.xml";
#[cfg(not(debug_assertions))]
const DESCRIPTOR_FILE: &str = "activation.cml";

/// One parsed module descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub code: String,
    pub serial_type: SerialType,
    pub expiration: Option<NaiveDate>,
    pub functionality: Vec<String>,
}

impl ModuleDescriptor {
    /// Parses a descriptor document. `path` only labels errors.
    pub fn parse(xml: &str, path: &Path) -> Result<Self> {
        let bad = |reason: String| Error::Descriptor {
            path: path.to_path_buf(),
            reason,
        };

        let doc = roxmltree::Document::parse(xml).map_err(|e| bad(e.to_string()))?;
        let root = doc.root_element();
        if root.tag_name().name() != "module" {
            return Err(bad(format!(
                "expected root element <module>, found <{}>",
                root.tag_name().name()
            )));
        }

        let attr = |name: &str| {
            root.attribute(name)
                .map(str::to_string)
                .ok_or_else(|| bad(format!("missing attribute {name:?}")))
        };

        let name = attr("name")?;
        let code = attr("code")?;
        let serial_type =
            SerialType::parse(&attr("serialType")?).map_err(|e| bad(e.to_string()))?;

        let expiration = if serial_type.has_expiration_date() {
            let raw = attr("expirationDate")?;
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|e| bad(format!("expirationDate {raw:?}: {e}")))?;
            Some(date)
        } else {
            None
        };

        let functionality = root
            .children()
            .filter(|n| n.has_tag_name("functionality"))
            .filter_map(|n| n.text())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self {
            name,
            code,
            serial_type,
            expiration,
            functionality,
        })
    }
}

/// Source of module descriptors. The store runs discovery at the start of
/// every load; production uses [`DirectoryDiscovery`], tests substitute
/// their own.
pub trait ModuleDiscovery {
    /// One result slot per candidate module, so a single bad descriptor
    /// never hides its siblings.
    fn discover(&self) -> Vec<Result<ModuleDescriptor>>;
}

/// Discovers modules from the installation tree: every immediate
/// subdirectory of the root that contains a `Menu` directory is expected to
/// hold one descriptor file there.
#[derive(Debug, Clone)]
pub struct DirectoryDiscovery {
    root: PathBuf,
}

impl DirectoryDiscovery {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_descriptor(path: &Path) -> Result<ModuleDescriptor> {
        let xml = fs::read_to_string(path).map_err(|e| Error::Descriptor {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        ModuleDescriptor::parse(&xml, path)
    }
}

impl ModuleDiscovery for DirectoryDiscovery {
    fn discover(&self) -> Vec<Result<ModuleDescriptor>> {
        let mut found = Vec::new();
        let Ok(entries) = fs::read_dir(&self.root) else {
            return found;
        };
        for entry in entries.flatten() {
            let menu_dir = entry.path().join("Menu");
            if !menu_dir.is_dir() {
                continue;
            }
            let descriptor = menu_dir.join(DESCRIPTOR_FILE);
            if descriptor.is_file() {
                found.push(Self::read_descriptor(&descriptor));
            }
        }
        found
    }
}
