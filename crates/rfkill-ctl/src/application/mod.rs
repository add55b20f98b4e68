//! Application layer use cases.
//!
//! # What use cases are there?
//!
//! - **`enumerate`** – Drains the backlog of `add` records the kernel queues
//!   when the control device is opened, yielding one event per registered
//!   switch.  Completion is detected by an idle window with no new records.
//!
//! - **`unblock_all`** – Enumerates the switches and lifts the soft block from
//!   every one that has it.  Device writes and name lookups go through a
//!   `RadioControl` implementation injected at construction time.

pub mod enumerate;
pub mod unblock_all;
