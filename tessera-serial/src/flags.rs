//! The serial-type flag set.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Which binding fields a module's licensing policy embeds in its serial.
///
/// Flags combine with `|`. The order fields appear in a serial is *not* the
/// order flags were combined in — it is the fixed canonical order: license,
/// MAC, expiration, pen drive, trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialType(u16);

/// Table mapping each flag to its stored symbolic name, in canonical
/// declaration order. Persistence and module descriptors use these names;
/// an unknown name is a parse error, never a fault.
const FLAG_NAMES: &[(SerialType, &str)] = &[
    (SerialType::MAC_ADDRESS, "MAC_ADDRESS"),
    (SerialType::LICENSE_NAME, "LICENSE_NAME"),
    (SerialType::EXPIRATION_DATE, "EXPIRATION_DATE"),
    (SerialType::PEN_DRIVE, "PEN_DRIVE"),
    (SerialType::TRIAL, "TRIAL"),
];

impl SerialType {
    /// No extra binding: the serial carries only the app+module hash and
    /// the checksum.
    pub const NAME_ONLY: Self = Self(0x0000);
    /// Bind to the machine's network MAC address.
    pub const MAC_ADDRESS: Self = Self(0x0001);
    /// Bind to the license holder's name.
    pub const LICENSE_NAME: Self = Self(0x0002);
    /// Embed an expiration date checked against the current day.
    pub const EXPIRATION_DATE: Self = Self(0x0004);
    /// Bind to a named USB drive's hardware serial.
    pub const PEN_DRIVE: Self = Self(0x0008);
    /// Mark the serial as a trial activation.
    pub const TRIAL: Self = Self(0x0010);

    /// Returns true if every flag in `other` is set in `self`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn has_mac_address(self) -> bool {
        self.contains(Self::MAC_ADDRESS)
    }

    #[must_use]
    pub fn has_license_name(self) -> bool {
        self.contains(Self::LICENSE_NAME)
    }

    #[must_use]
    pub fn has_expiration_date(self) -> bool {
        self.contains(Self::EXPIRATION_DATE)
    }

    #[must_use]
    pub fn has_pen_drive(self) -> bool {
        self.contains(Self::PEN_DRIVE)
    }

    #[must_use]
    pub fn has_trial(self) -> bool {
        self.contains(Self::TRIAL)
    }

    /// Number of flags set, i.e. the number of binding fields between the
    /// app+module hash and the checksum in a well-formed serial.
    #[must_use]
    pub fn field_count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Parses a symbolic flag list: a single name (`"NAME_ONLY"`,
    /// `"TRIAL"`) or a comma-separated combination
    /// (`"MAC_ADDRESS, EXPIRATION_DATE"`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFlag`] for any name not in the mapping table.
    pub fn parse(text: &str) -> Result<Self> {
        let mut flags = Self::NAME_ONLY;
        for name in text.split(',') {
            let name = name.trim();
            if name.is_empty() || name == "NAME_ONLY" {
                continue;
            }
            let (flag, _) = FLAG_NAMES
                .iter()
                .find(|(_, n)| *n == name)
                .ok_or_else(|| Error::UnknownFlag(name.to_string()))?;
            flags |= *flag;
        }
        Ok(flags)
    }
}

impl BitOr for SerialType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SerialType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for SerialType {
    /// Renders the symbolic form parsed by [`SerialType::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NAME_ONLY {
            return f.write_str("NAME_ONLY");
        }
        let mut first = true;
        for (flag, name) in FLAG_NAMES {
            if self.contains(*flag) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
