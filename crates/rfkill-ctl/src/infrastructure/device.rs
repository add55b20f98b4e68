//! Access to the rfkill control device.
//!
//! [`ControlDevice`] names the character device (normally `/dev/rfkill`) and
//! knows how to open it for reading or writing.  [`DeviceReader`] wraps a
//! read handle so the watcher's decode task can wait for the next record
//! without blocking a runtime thread.
//!
//! # Why non-blocking? (for beginners)
//!
//! A read on `/dev/rfkill` sleeps inside the kernel until the next switch
//! event, which may be never.  A thread stuck in such a read cannot be told
//! to stop.  Opening the device with `O_NONBLOCK` and registering it with the
//! Tokio reactor turns "wait for data" into an ordinary future: the reactor
//! wakes us when the kernel reports the device readable, and a pending wait
//! can simply be dropped when the watcher is closed.
//!
//! Regular files cannot be registered with epoll (the kernel answers
//! `EPERM`).  They never block either, so a plain `tokio::fs::File` is used
//! for them.  This is what lets tests point a watcher at a temp file full of
//! pre-encoded records.

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rfkill_core::{decode, Event, EVENT_SIZE};
use thiserror::Error;
use tokio::io::unix::AsyncFd;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Well-known path of the rfkill control device.
pub const DEFAULT_CONTROL_PATH: &str = "/dev/rfkill";

/// Error type for every operation on the control device.
///
/// I/O errors are held in an `Arc` so that the watcher's terminal error can
/// be handed out by reference and cloned by callers that need to keep it.
#[derive(Debug, Clone, Error)]
pub enum RfkillError {
    /// The control device path does not exist (rfkill module not loaded?).
    #[error("rfkill: control device is missing: {path}")]
    DeviceMissing { path: PathBuf },

    /// The device exists but could not be opened (permissions, fd limits).
    #[error("rfkill: failed to open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// A record could not be decoded.
    #[error("rfkill: {0}")]
    Protocol(#[from] rfkill_core::ProtocolError),

    /// Reading from the device failed.
    #[error("rfkill: read failed: {0}")]
    Read(#[source] Arc<io::Error>),

    /// The device reported end of file at a record boundary.
    #[error("rfkill: end of event stream")]
    EndOfStream,

    /// A command could not be written in full.
    #[error("rfkill: failed to write command to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// The watcher was closed by its owner.  Not a failure.
    #[error("rfkill: closed")]
    Closed,

    /// A sysfs attribute could not be read.
    #[error("rfkill: failed to read {path}: {source}")]
    Sysfs {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// The watcher's decode task panicked or was aborted.
    #[error("rfkill: decode task failed: {0}")]
    TaskFailed(String),
}

impl RfkillError {
    /// Whether this terminal condition is an ordinary end of the stream
    /// (explicit close or end of file) rather than a failure.
    pub fn is_normal_end(&self) -> bool {
        matches!(self, RfkillError::Closed | RfkillError::EndOfStream)
    }

    fn open(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            RfkillError::DeviceMissing {
                path: path.to_path_buf(),
            }
        } else {
            RfkillError::OpenFailed {
                path: path.to_path_buf(),
                source: Arc::new(source),
            }
        }
    }
}

// ── Control device ────────────────────────────────────────────────────────────

/// The rfkill control device.
///
/// Cheap to clone; it only holds the path.  Every operation opens its own
/// handle, so a watcher and a command writer never share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDevice {
    path: PathBuf,
}

impl ControlDevice {
    /// Points at a control device other than `/dev/rfkill`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the device read-only and non-blocking.
    ///
    /// # Errors
    ///
    /// [`RfkillError::DeviceMissing`] if the path does not exist,
    /// [`RfkillError::OpenFailed`] for any other OS error.
    pub(crate) fn open_read(&self) -> Result<File, RfkillError> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&self.path)
            .map_err(|e| RfkillError::open(&self.path, e))?;
        debug!(path = %self.path.display(), "opened control device for reading");
        Ok(file)
    }

    /// Opens the device write-only.
    ///
    /// # Errors
    ///
    /// Same as [`ControlDevice::open_read`].
    pub(crate) fn open_write(&self) -> Result<File, RfkillError> {
        OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| RfkillError::open(&self.path, e))
    }

    pub(crate) fn open_failed(&self, source: io::Error) -> RfkillError {
        RfkillError::OpenFailed {
            path: self.path.clone(),
            source: Arc::new(source),
        }
    }
}

impl Default for ControlDevice {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROL_PATH)
    }
}

// ── Reader ────────────────────────────────────────────────────────────────────

/// A read handle on the control device, owned by one watcher task.
///
/// Dropping it closes the underlying file descriptor.
pub(crate) enum DeviceReader {
    /// Character device or FIFO registered with the Tokio reactor.
    Pollable(AsyncFd<File>),
    /// Regular file; reads complete immediately.
    Regular(tokio::fs::File),
}

impl DeviceReader {
    /// Wraps a handle returned by [`ControlDevice::open_read`].
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn new(file: File) -> io::Result<Self> {
        match AsyncFd::try_new(file) {
            Ok(fd) => Ok(DeviceReader::Pollable(fd)),
            Err(e) => {
                let (file, err) = e.into_parts();
                if err.raw_os_error() == Some(libc::EPERM) {
                    Ok(DeviceReader::Regular(tokio::fs::File::from_std(file)))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Reads whatever is available into `buf`, waiting until something is.
    ///
    /// Returns `Ok(0)` at end of file.
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DeviceReader::Pollable(fd) => loop {
                let mut guard = fd.readable().await?;
                match guard.try_io(|inner| inner.get_ref().read(buf)) {
                    Ok(result) => return result,
                    Err(_would_block) => continue,
                }
            },
            DeviceReader::Regular(file) => file.read(buf).await,
        }
    }

    /// Reads and decodes one full record.
    ///
    /// The kernel returns one record per `read`, but a FIFO or file may
    /// split it, so short reads are accumulated until the record is complete.
    ///
    /// # Errors
    ///
    /// - [`RfkillError::EndOfStream`] if end of file is hit before any byte
    ///   of the next record.
    /// - [`RfkillError::Protocol`] if end of file cuts a record short.
    /// - [`RfkillError::Read`] for OS read errors.
    pub(crate) async fn read_event(&mut self) -> Result<Event, RfkillError> {
        let mut buf = [0u8; EVENT_SIZE];
        let mut filled = 0;
        while filled < EVENT_SIZE {
            let n = self
                .read(&mut buf[filled..])
                .await
                .map_err(|e| RfkillError::Read(Arc::new(e)))?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            return Err(RfkillError::EndOfStream);
        }
        Ok(decode(&buf[..filled])?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
