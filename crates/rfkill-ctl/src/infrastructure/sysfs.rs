//! Device-name lookup through sysfs.
//!
//! The kernel exposes every rfkill switch as `/sys/class/rfkill/rfkill<N>/`,
//! where `N` is the index carried in event records.  Its `name` attribute is
//! the human-readable driver name, e.g. `phy0` or `hci0`.

use std::path::PathBuf;
use std::sync::Arc;

use super::device::RfkillError;

/// Default sysfs class directory for rfkill switches.
pub const DEFAULT_SYSFS_CLASS_DIR: &str = "/sys/class/rfkill";

/// Reads per-device attributes from the rfkill sysfs class directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsNames {
    class_dir: PathBuf,
}

impl SysfsNames {
    pub fn new(class_dir: impl Into<PathBuf>) -> Self {
        Self {
            class_dir: class_dir.into(),
        }
    }

    /// Path of the `name` attribute for device `index`.
    pub fn name_path(&self, index: u32) -> PathBuf {
        self.class_dir.join(format!("rfkill{index}")).join("name")
    }

    /// Returns the trimmed contents of the device's `name` attribute.
    ///
    /// # Errors
    ///
    /// [`RfkillError::Sysfs`] if the attribute cannot be read, e.g. because
    /// the device has since been removed.
    pub fn device_name(&self, index: u32) -> Result<String, RfkillError> {
        let path = self.name_path(index);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content.trim().to_string()),
            Err(source) => Err(RfkillError::Sysfs {
                path,
                source: Arc::new(source),
            }),
        }
    }
}

impl Default for SysfsNames {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_CLASS_DIR)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
