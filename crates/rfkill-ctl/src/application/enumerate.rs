//! Enumerate currently registered rfkill switches.
//!
//! Right after the control device is opened, the kernel queues one `add`
//! record for every switch it knows about.  Enumeration opens a watcher
//! filtered to `add`, takes records until none arrives for one idle window,
//! and closes the watcher again.
//!
//! The idle window is a quiescence detector, not a cap: a device that keeps
//! producing `add` records faster than the window keeps enumeration running.
//! There is no protocol-level "end of backlog" marker to use instead.

use std::time::Duration;

use rfkill_core::{Event, Operation};
use tracing::{debug, warn};

use crate::infrastructure::device::{ControlDevice, RfkillError};
use crate::infrastructure::watcher::Watcher;

/// Idle window used when the caller has no configured value.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(10);

/// Calls `handler` once for every currently registered switch.
///
/// The watcher is closed before returning, whatever the outcome.
///
/// # Errors
///
/// - Any error returned by `handler`, immediately.
/// - [`RfkillError`] (converted into `E`) if the device cannot be opened or
///   the stream ends with a real error.  End of file counts as a drained
///   backlog, not as an error.
pub async fn for_each_device<F, E>(
    device: &ControlDevice,
    idle_timeout: Duration,
    mut handler: F,
) -> Result<(), E>
where
    F: FnMut(Event) -> Result<(), E>,
    E: From<RfkillError>,
{
    let mut watcher = Watcher::open(device, [Operation::Add])?;
    let result = drain(&mut watcher, idle_timeout, &mut handler).await;

    if let Err(e) = watcher.close().await {
        if result.is_ok() {
            return Err(e.into());
        }
        warn!(error = %e, "failed to close watcher after enumeration error");
    }
    result
}

/// Collects every currently registered switch.
///
/// # Errors
///
/// Same as [`for_each_device`].
pub async fn list_devices(
    device: &ControlDevice,
    idle_timeout: Duration,
) -> Result<Vec<Event>, RfkillError> {
    let mut devices = Vec::new();
    for_each_device(device, idle_timeout, |ev| {
        devices.push(ev);
        Ok::<_, RfkillError>(())
    })
    .await?;
    Ok(devices)
}

async fn drain<F, E>(watcher: &mut Watcher, idle_timeout: Duration, handler: &mut F) -> Result<(), E>
where
    F: FnMut(Event) -> Result<(), E>,
    E: From<RfkillError>,
{
    let mut seen = 0usize;
    loop {
        match tokio::time::timeout(idle_timeout, watcher.recv()).await {
            Err(_elapsed) => {
                debug!(seen, "no event within idle window; enumeration complete");
                return Ok(());
            }
            Ok(Some(event)) => {
                seen += 1;
                handler(event)?;
            }
            Ok(None) => {
                return match watcher.error() {
                    Some(e) if !e.is_normal_end() => Err(e.clone().into()),
                    _ => {
                        debug!(seen, "event stream ended; enumeration complete");
                        Ok(())
                    }
                };
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
