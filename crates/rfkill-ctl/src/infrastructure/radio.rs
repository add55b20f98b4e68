//! [`RadioControl`] backed by the real control device and sysfs.

use crate::application::unblock_all::RadioControl;

use super::device::{ControlDevice, RfkillError};
use super::sysfs::SysfsNames;

/// Talks to the kernel through the control device and the sysfs class dir.
#[derive(Debug, Clone, Default)]
pub struct SystemRadios {
    device: ControlDevice,
    names: SysfsNames,
}

impl SystemRadios {
    pub fn new(device: ControlDevice, names: SysfsNames) -> Self {
        Self { device, names }
    }
}

impl RadioControl for SystemRadios {
    fn device_name(&self, index: u32) -> Result<String, RfkillError> {
        self.names.device_name(index)
    }

    fn set_blocked(&self, index: u32, blocked: bool) -> Result<(), RfkillError> {
        self.device.set_blocked(index, blocked)
    }
}
