//! Command writer: soft-block or unblock radios.
//!
//! Each call opens its own write-only handle, writes exactly one encoded
//! record, and closes the handle again.  Hard-block state cannot be changed
//! from user space; the kernel ignores the `hard` byte of a written record.

use std::io::Write;
use std::sync::Arc;

use rfkill_core::{encode, Event, Kind};
use tracing::info;

use super::device::{ControlDevice, RfkillError};

impl ControlDevice {
    /// Soft-blocks (`blocked = true`) or unblocks one device by index.
    ///
    /// # Errors
    ///
    /// [`RfkillError::DeviceMissing`] / [`RfkillError::OpenFailed`] if the
    /// device cannot be opened, [`RfkillError::Write`] if the record could
    /// not be written in full.
    pub fn set_blocked(&self, index: u32, blocked: bool) -> Result<(), RfkillError> {
        self.write_event(&Event::change(index, blocked))?;
        info!(index, blocked, "rfkill soft block changed");
        Ok(())
    }

    /// Soft-blocks or unblocks every device of `kind` with one `change-all`
    /// record.  [`Kind::All`] addresses every radio in the machine.
    ///
    /// # Errors
    ///
    /// Same as [`ControlDevice::set_blocked`].
    pub fn set_kind_blocked(&self, kind: Kind, blocked: bool) -> Result<(), RfkillError> {
        self.write_event(&Event::change_all(kind, blocked))?;
        info!(%kind, blocked, "rfkill soft block changed for all devices of kind");
        Ok(())
    }

    /// Writes one raw record to the device.
    ///
    /// # Errors
    ///
    /// Same as [`ControlDevice::set_blocked`].
    pub fn write_event(&self, event: &Event) -> Result<(), RfkillError> {
        let mut file = self.open_write()?;
        file.write_all(&encode(event))
            .map_err(|source| RfkillError::Write {
                path: self.path().to_path_buf(),
                source: Arc::new(source),
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rfkill_core::{decode, Operation};
    use std::path::PathBuf;

    fn empty_device() -> (ControlDevice, PathBuf) {
        let path = std::env::temp_dir().join(format!("rfkill_cmd_{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"").unwrap();
        (ControlDevice::new(&path), path)
    }

    #[test]
    fn test_set_blocked_writes_change_record() {
        // Arrange
        let (device, path) = empty_device();

        // Act
        device.set_blocked(3, true).unwrap();

        // Assert
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 8);
        let ev = decode(&bytes).unwrap();
        assert_eq!(ev.index, 3);
        assert_eq!(ev.operation, Operation::Change);
        assert_eq!(ev.soft, 1);
        assert_eq!(ev.hard, 0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_set_blocked_false_writes_zero_soft_byte() {
        let (device, path) = empty_device();

        device.set_blocked(0, false).unwrap();

        let ev = decode(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(ev, Event::change(0, false));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_set_kind_blocked_writes_change_all_record() {
        let (device, path) = empty_device();

        device.set_kind_blocked(Kind::Bluetooth, true).unwrap();

        let ev = decode(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(ev.operation, Operation::ChangeAll);
        assert_eq!(ev.kind, Kind::Bluetooth);
        assert_eq!(ev.soft, 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_set_blocked_on_missing_device_fails() {
        let device = ControlDevice::new("/nonexistent/rfkill/control");
        let err = device.set_blocked(1, true).unwrap_err();
        assert!(matches!(err, RfkillError::DeviceMissing { .. }), "got {err:?}");
    }
}
