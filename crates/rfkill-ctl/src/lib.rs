//! rfkill-ctl library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What is rfkill? (for beginners)
//!
//! Linux keeps one *kill switch* per radio (Wi-Fi card, Bluetooth adapter,
//! WWAN modem, ...).  A switch can be:
//!
//! - **soft-blocked** – turned off by software; user space can lift it.
//! - **hard-blocked** – turned off by a physical switch or firmware; only the
//!   hardware can lift it.
//!
//! The kernel exposes every switch through one character device,
//! `/dev/rfkill`.  Reading it yields fixed 8-byte records: first one `add`
//! record per existing switch, then a live stream of `add` / `del` / `change`
//! records as radios appear, disappear, or change state.  Writing a `change`
//! record to it soft-blocks or unblocks a radio.
//!
//! This crate provides:
//!
//! 1. A cancellable [`Watcher`] over that stream, with operation filtering.
//! 2. One-shot enumeration of the current switches
//!    ([`application::enumerate::for_each_device`]).
//! 3. [`ControlDevice::set_blocked`] and friends to change soft-block state.
//! 4. The `rfkill-ctl` command-line tool built on top of them.

/// Application layer: enumeration and unblock-all use cases.
pub mod application;

/// Infrastructure layer: device I/O, sysfs, and config storage.
pub mod infrastructure;

pub use application::enumerate::{for_each_device, list_devices, DEFAULT_IDLE_TIMEOUT};
pub use infrastructure::{ControlDevice, RfkillError, Watcher};
pub use rfkill_core::{Event, Kind, Operation};
