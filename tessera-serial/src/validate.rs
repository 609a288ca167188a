//! Serial validation.
//!
//! Two independent checks, both fail-closed: [`is_well_formed`] verifies the
//! serial against itself (checksum, app+module hash), [`fields_match`]
//! verifies each embedded binding field against the machine and license the
//! serial is being redeemed on. Neither ever panics or returns an error —
//! a serial that cannot be parsed is simply not valid.

use crate::codec::{decode_int, encode_mac, encode_serial_number, encode_text};
use crate::compose::day_ordinal;
use crate::flags::SerialType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The evaluated licensing status of a module. Derived fresh on every
/// query, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationState {
    /// Serial present, well-formed, and every required field matches.
    Activated,
    /// Missing, malformed, or mismatched serial.
    NotActivated,
    /// As `Activated`, but the serial carries the trial marker.
    Trial,
}

/// The runtime values binding fields are checked against.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedFields<'a> {
    /// The license holder's name on file.
    pub license: &'a str,
    /// This machine's network MAC address (colon-separated hex).
    pub mac_address: &'a str,
    /// The day expiration fields are compared to.
    pub today: NaiveDate,
    /// Hardware serial of the bound USB drive, `None` when the drive is
    /// absent or unresolvable.
    pub pen_drive_serial: Option<&'a str>,
}

/// Checks that a serial is internally consistent: the last field must be
/// `encode_text` over the concatenation of all preceding fields, and the
/// first field must hash the same app and module codes used at composition
/// time.
#[must_use]
pub fn is_well_formed(serial: &str, app_code: &str, module_code: &str) -> bool {
    let parts: Vec<&str> = serial.split('-').collect();
    let Some((checksum, body)) = parts.split_last() else {
        return false;
    };
    if body.is_empty() {
        return false;
    }
    if encode_text(&body.concat()) != *checksum {
        return false;
    }
    body[0] == encode_text(&format!("{app_code}{module_code}"))
}

/// Checks every binding field the module's policy requires against the
/// expected runtime values, walking the canonical field order. The first
/// mismatch — or a missing part — fails closed.
///
/// The expiration check is an ordering, not an equality: the embedded day
/// ordinal must be on or after `today`. The trial field carries a constant
/// marker and is not re-compared here; the checksum already covers it.
#[must_use]
pub fn fields_match(serial: &str, serial_type: SerialType, expected: &ExpectedFields<'_>) -> bool {
    let parts: Vec<&str> = serial.split('-').collect();
    let mut pos = 1;
    let mut next = || {
        let part = parts.get(pos).copied();
        pos += 1;
        part
    };

    if serial_type.has_license_name() {
        match next() {
            Some(part) if part == encode_text(expected.license) => {}
            _ => return false,
        }
    }

    if serial_type.has_mac_address() {
        match (next(), encode_mac(expected.mac_address)) {
            (Some(part), Ok(enc)) if part == enc => {}
            _ => return false,
        }
    }

    if serial_type.has_expiration_date() {
        match next().map(decode_int) {
            Some(Ok(ordinal)) if ordinal >= day_ordinal(expected.today) => {}
            _ => return false,
        }
    }

    if serial_type.has_pen_drive() {
        let Some(hw_serial) = expected.pen_drive_serial.filter(|s| !s.is_empty()) else {
            return false;
        };
        match (next(), encode_serial_number(hw_serial)) {
            (Some(part), Ok(enc)) if part == enc => {}
            _ => return false,
        }
    }

    true
}
