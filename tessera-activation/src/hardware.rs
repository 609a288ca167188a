//! Hardware identity: the machine's MAC address and USB drive serials.
//!
//! Treated as an external collaborator that may be slow or come up empty.
//! An empty answer is never an error here — it flows into a failed field
//! check at validation time.

/// Supplies the hardware identifiers serials bind to.
pub trait HardwareIdentity {
    /// This machine's network MAC address as colon-separated uppercase hex,
    /// or empty when none can be determined.
    fn mac_address(&self) -> String;

    /// Hardware serial (hex) of the external drive with the given volume
    /// label, or empty when the drive is absent or unresolvable.
    fn drive_serial(&self, name: &str) -> String;
}

/// Hardware identity read from the running system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHardware;

impl HardwareIdentity for SystemHardware {
    fn mac_address(&self) -> String {
        read_mac_address().unwrap_or_default()
    }

    fn drive_serial(&self, name: &str) -> String {
        read_drive_serial(name).unwrap_or_default()
    }
}

/// Finds the first non-loopback network interface's MAC address.
fn read_mac_address() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let entries = std::fs::read_dir("/sys/class/net").ok()?;
        for entry in entries.flatten() {
            if entry.file_name() == "lo" {
                continue;
            }
            let address = entry.path().join("address");
            if let Ok(mac) = std::fs::read_to_string(address) {
                let mac = mac.trim().to_uppercase();
                if !mac.is_empty() && mac != "00:00:00:00:00:00" {
                    return Some(mac);
                }
            }
        }
        None
    }

    #[cfg(not(target_os = "linux"))]
    {
        // Other platforms answer through their native adapter enumeration;
        // empty keeps MAC-bound checks failing closed rather than faulting.
        None
    }
}

/// Resolves a volume label to the backing USB device's hardware serial.
fn read_drive_serial(name: &str) -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        if name.is_empty() {
            return None;
        }
        // The label symlink and the usb id symlink both point at the same
        // device node; the id file name is `usb-<vendor>_<model>_<serial>-0:0`
        // with the serial as the last underscore-separated segment.
        let label = std::path::Path::new("/dev/disk/by-label").join(name);
        let device = std::fs::canonicalize(label).ok()?;
        let entries = std::fs::read_dir("/dev/disk/by-id").ok()?;
        for entry in entries.flatten() {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(id) = file_name.strip_prefix("usb-") else {
                continue;
            };
            let Ok(target) = std::fs::canonicalize(entry.path()) else {
                continue;
            };
            if target == device {
                let id = id.split("-0:").next().unwrap_or(id);
                let serial = id.rsplit('_').next()?;
                return Some(serial.to_uppercase());
            }
        }
        None
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = name;
        None
    }
}
