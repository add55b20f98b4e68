//! Infrastructure layer: everything that touches the operating system.
//!
//! **Dependency rule**: this layer may depend on `application` (to implement
//! its traits) and `rfkill_core`.  The enumeration use case is the one place
//! where `application` reaches back down, because it *is* a read loop over a
//! [`Watcher`].
//!
//! # Sub-modules
//!
//! - **`device`** – The control device path, opening it for reading or
//!   writing, and the non-blocking record reader.  Also home to
//!   [`RfkillError`].
//!
//! - **`watcher`** – A background decode task that streams filtered events
//!   and can be cancelled while it is blocked on a read.
//!
//! - **`command`** – One-shot writes of `change` / `change-all` records.
//!
//! - **`sysfs`** – Device-name lookup under `/sys/class/rfkill`.
//!
//! - **`radio`** – `RadioControl` backed by `command` and `sysfs`.
//!
//! - **`storage`** – TOML config file loading.

pub mod command;
pub mod device;
pub mod radio;
pub mod storage;
pub mod sysfs;
pub mod watcher;

pub use device::{ControlDevice, RfkillError, DEFAULT_CONTROL_PATH};
pub use radio::SystemRadios;
pub use sysfs::{SysfsNames, DEFAULT_SYSFS_CLASS_DIR};
pub use watcher::Watcher;
