//! Serial composition.

use crate::codec::{encode_int, encode_mac, encode_serial_number, encode_text};
use crate::error::{Error, Result};
use crate::flags::SerialType;
use chrono::{Datelike, NaiveDate};

/// Constant marker hashed into the trial field.
pub const TRIAL_MARKER: &str = "TRIAL VERSION";

/// Everything the composer needs to manufacture one activation serial.
///
/// `pen_drive_serial` is the USB drive's *hardware* serial as a hex string,
/// already resolved from the drive's name by the caller; resolution lives
/// behind the hardware-identity seam, not here.
#[derive(Debug, Clone, Copy)]
pub struct SerialRequest<'a> {
    pub license: &'a str,
    pub mac_address: &'a str,
    pub app_code: &'a str,
    pub module_code: &'a str,
    pub serial_type: SerialType,
    pub expiration: Option<NaiveDate>,
    pub pen_drive_serial: &'a str,
}

/// Collapses a date to the day ordinal embedded in expiration fields:
/// `year*365 + month*31 + day`.
///
/// Not a calendar-exact day count, and not monotonic across every year
/// boundary. It is the exact formula the validating side decodes against,
/// so it must never be corrected.
#[must_use]
pub fn day_ordinal(date: NaiveDate) -> u64 {
    date.year() as u64 * 365 + u64::from(date.month()) * 31 + u64::from(date.day())
}

/// Assembles a dash-delimited activation serial.
///
/// Field 0 hashes the app code concatenated with the module code. One field
/// follows per flag set in `serial_type`, in canonical order (license, MAC,
/// expiration, pen drive, trial). The final field is `encode_text` over the
/// concatenation of all prior fields with the dashes removed — exactly what
/// [`crate::is_well_formed`] recomputes.
///
/// # Errors
///
/// Fails if the expiration flag is set without a date, or if the MAC or
/// pen-drive serial contain non-hex characters.
pub fn compose(req: &SerialRequest<'_>) -> Result<String> {
    let st = req.serial_type;
    let mut fields = Vec::with_capacity(2 + st.field_count());

    fields.push(encode_text(&format!("{}{}", req.app_code, req.module_code)));

    if st.has_license_name() {
        fields.push(encode_text(req.license));
    }
    if st.has_mac_address() {
        fields.push(encode_mac(req.mac_address)?);
    }
    if st.has_expiration_date() {
        let expiration = req.expiration.ok_or(Error::MissingExpiration)?;
        fields.push(encode_int(day_ordinal(expiration)));
    }
    if st.has_pen_drive() {
        fields.push(encode_serial_number(req.pen_drive_serial)?);
    }
    if st.has_trial() {
        fields.push(encode_text(TRIAL_MARKER));
    }

    let checksum = encode_text(&fields.concat());
    fields.push(checksum);
    Ok(fields.join("-"))
}
