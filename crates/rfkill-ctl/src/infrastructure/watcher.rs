//! Watcher: a live, cancellable stream of rfkill events.
//!
//! Opening a watcher opens the control device and spawns one Tokio task that
//! decodes records and hands them over through a single-slot channel.
//!
//! ```text
//!  /dev/rfkill ──read──▶ decode task ──filter──▶ mpsc(1) ──▶ Watcher::recv()
//!                            ▲
//!                 CancellationToken (Watcher::close)
//! ```
//!
//! # Shutdown
//!
//! The decode task spends most of its life waiting for the kernel to report
//! the next event.  `close()` records [`RfkillError::Closed`] as the terminal
//! condition, cancels the token, and waits for the task to finish.  The task
//! races every slot reservation and every read against the token, so it
//! notices the cancellation immediately, drops its device handle (closing it
//! exactly once), and never touches the device again.
//!
//! A read that fails *after* cancellation is the expected shutdown path and is
//! not reported.  Any other failure becomes the watcher's terminal error.
//!
//! # Ordering
//!
//! Events come out in the order the kernel emitted them.  The channel holds at
//! most one event, and the task claims that slot before it reads, so the
//! device is never read more than one record ahead of the consumer.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use futures::Stream;
use rfkill_core::{Event, Operation};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::device::{ControlDevice, DeviceReader, RfkillError};

/// An open watch session on the control device.
///
/// Dropping a watcher without calling [`Watcher::close`] still stops the
/// decode task; `close` additionally waits for it and records
/// [`RfkillError::Closed`].
pub struct Watcher {
    path: PathBuf,
    events: mpsc::Receiver<Event>,
    cancel: CancellationToken,
    terminal: Arc<OnceLock<RfkillError>>,
    task: Option<JoinHandle<()>>,
}

impl Watcher {
    /// Opens `device` for reading and starts the decode task.
    ///
    /// When `filters` is empty every event is delivered; otherwise only
    /// events whose operation is in the set.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`RfkillError::DeviceMissing`] if the device path does not exist,
    /// [`RfkillError::OpenFailed`] for any other open failure.
    pub fn open<I>(device: &ControlDevice, filters: I) -> Result<Self, RfkillError>
    where
        I: IntoIterator<Item = Operation>,
    {
        let filters: HashSet<Operation> = filters.into_iter().collect();
        let file = device.open_read()?;
        let reader = DeviceReader::new(file).map_err(|e| device.open_failed(e))?;

        let (tx, rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let terminal = Arc::new(OnceLock::new());

        debug!(
            path = %device.path().display(),
            filters = ?filters,
            "starting rfkill watcher"
        );
        let task = tokio::spawn(decode_loop(
            reader,
            filters,
            tx,
            cancel.clone(),
            Arc::clone(&terminal),
        ));

        Ok(Self {
            path: device.path().to_path_buf(),
            events: rx,
            cancel,
            terminal,
            task: Some(task),
        })
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the decode task has stopped and every event it
    /// handed over has been taken.  Check [`Watcher::error`] afterwards.
    pub async fn recv(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// The events as a [`Stream`].
    ///
    /// Single-pass: items taken here are gone for [`Watcher::recv`] too.
    pub fn stream(&mut self) -> impl Stream<Item = Event> + '_ {
        futures::stream::poll_fn(move |cx| self.events.poll_recv(cx))
    }

    /// Why the stream ended.
    ///
    /// Only meaningful after [`Watcher::recv`] returned `None` or after
    /// [`Watcher::close`].  `None` means the decode task is still running.
    pub fn error(&self) -> Option<&RfkillError> {
        self.terminal.get()
    }

    /// Whether [`Watcher::close`] has already run.
    pub fn is_closed(&self) -> bool {
        self.task.is_none()
    }

    /// Stops the watcher and closes the device handle.
    ///
    /// Idempotent: calling it again returns `Ok(())` without doing anything.
    /// Events already handed over can still be drained with
    /// [`Watcher::recv`] after this returns.
    ///
    /// # Errors
    ///
    /// [`RfkillError::TaskFailed`] if the decode task panicked.
    pub async fn close(&mut self) -> Result<(), RfkillError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        // An error recorded earlier by the decode task takes precedence.
        let _ = self.terminal.set(RfkillError::Closed);
        self.cancel.cancel();

        let joined = task.await;
        debug!(path = %self.path.display(), "rfkill watcher closed");
        joined.map_err(|e| RfkillError::TaskFailed(e.to_string()))
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Body of the decode task.
async fn decode_loop(
    mut reader: DeviceReader,
    filters: HashSet<Operation>,
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
    terminal: Arc<OnceLock<RfkillError>>,
) {
    'decode: loop {
        // The slot is claimed before reading so that at most one record has
        // left the device ahead of the consumer.
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            reserved = tx.reserve() => match reserved {
                Ok(permit) => permit,
                // Receiver dropped together with the watcher.
                Err(_) => break,
            },
        };

        let event = loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'decode,
                result = reader.read_event() => match result {
                    Ok(event) => event,
                    Err(_) if cancel.is_cancelled() => break 'decode,
                    Err(e) => {
                        warn!(error = %e, "rfkill watcher stopped");
                        let _ = terminal.set(e);
                        break 'decode;
                    }
                },
            };

            if filters.is_empty() || filters.contains(&event.operation) {
                break event;
            }
            trace!(%event, "filtered out");
        };

        permit.send(event);
    }
    trace!("decode task finished");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
