//! # rfkill-core
//!
//! Shared wire model for the Linux rfkill control device: the event record,
//! its enumerated fields, and the binary codec.
//!
//! This crate performs no I/O.  Opening `/dev/rfkill`, watching it and writing
//! commands live in `rfkill-ctl`.
//!
//! # What is rfkill? (for beginners)
//!
//! Every wireless radio in a Linux machine (Wi-Fi card, Bluetooth adapter,
//! WWAN modem, ...) registers a *kill switch* with the kernel.  A switch can
//! be *soft blocked* by software or *hard blocked* by a physical switch.  The
//! kernel exposes all switches through one character device, `/dev/rfkill`:
//!
//! - Reading it yields a stream of fixed-size event records: one `add` per
//!   existing switch right after open, then `add`/`delete`/`change` records
//!   as switches appear, disappear, or toggle.
//! - Writing a record to it requests a soft block or unblock.
//!
//! - **`protocol::event`** – the [`Event`] record plus [`Kind`] and
//!   [`Operation`].
//! - **`protocol::codec`** – [`encode`] / [`decode`] between an `Event` and its
//!   8-byte wire form.

pub mod protocol;

pub use protocol::codec::{decode, encode, ByteOrder, ProtocolError};
pub use protocol::event::{Event, Kind, Operation, EVENT_SIZE};
