//! UnblockAllUseCase: lift the soft block from every radio in the machine.
//!
//! Enumerates the registered switches and, for each one that is currently
//! soft-blocked, looks up its sysfs name and writes a `change` record that
//! clears the block.  Switches that are only hard-blocked are left alone:
//! user space cannot lift a hard block.
//!
//! The actual device writes and name lookups go through a [`RadioControl`]
//! implementation injected at construction time.

use std::sync::Arc;
use std::time::Duration;

use rfkill_core::Event;
use tracing::{debug, info};

use crate::application::enumerate::for_each_device;
use crate::infrastructure::device::{ControlDevice, RfkillError};

/// Radio-side operations the use case needs.
///
/// The infrastructure layer provides the real implementation backed by the
/// control device and sysfs.
pub trait RadioControl: Send + Sync {
    /// Human-readable name of device `index`.
    fn device_name(&self, index: u32) -> Result<String, RfkillError>;

    /// Soft-blocks or unblocks device `index`.
    fn set_blocked(&self, index: u32, blocked: bool) -> Result<(), RfkillError>;
}

/// The Unblock All use case.
pub struct UnblockAllUseCase {
    radios: Arc<dyn RadioControl>,
}

impl UnblockAllUseCase {
    pub fn new(radios: Arc<dyn RadioControl>) -> Self {
        Self { radios }
    }

    /// Handles one enumerated switch.
    ///
    /// Returns the device name if it was unblocked, `None` if it was not
    /// soft-blocked to begin with.
    ///
    /// # Errors
    ///
    /// Propagates name-lookup and write failures.
    pub fn handle(&self, event: &Event) -> Result<Option<String>, RfkillError> {
        self.handle_with(event, &mut |_| {})
    }

    /// Like [`UnblockAllUseCase::handle`], but calls `on_unblock` with the
    /// device name right before the unblock is written.
    ///
    /// # Errors
    ///
    /// Propagates name-lookup and write failures.  When the write fails,
    /// `on_unblock` has already been called for that device.
    pub fn handle_with<F>(
        &self,
        event: &Event,
        on_unblock: &mut F,
    ) -> Result<Option<String>, RfkillError>
    where
        F: FnMut(&str),
    {
        if !event.is_soft_blocked() {
            debug!(index = event.index, "not soft-blocked; skipping");
            return Ok(None);
        }

        let name = self.radios.device_name(event.index)?;
        info!("unblocking: {name}");
        on_unblock(&name);
        self.radios.set_blocked(event.index, false)?;
        Ok(Some(name))
    }

    /// Enumerates `device` and unblocks every soft-blocked switch.
    ///
    /// `on_unblock` is called with each device name before its write, so a
    /// caller reporting progress sees every device touched even when a later
    /// one fails.  Returns the names of the switches that were unblocked, in
    /// enumeration order.  Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Enumeration errors and any error from [`UnblockAllUseCase::handle`].
    pub async fn run<F>(
        &self,
        device: &ControlDevice,
        idle_timeout: Duration,
        mut on_unblock: F,
    ) -> Result<Vec<String>, RfkillError>
    where
        F: FnMut(&str),
    {
        let mut unblocked = Vec::new();
        for_each_device(device, idle_timeout, |event| {
            if let Some(name) = self.handle_with(&event, &mut on_unblock)? {
                unblocked.push(name);
            }
            Ok::<_, RfkillError>(())
        })
        .await?;
        Ok(unblocked)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
