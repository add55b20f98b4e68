//! TOML-based configuration for `rfkill-ctl`.
//!
//! Read from `$XDG_CONFIG_HOME/rfkill-ctl/config.toml`, or
//! `~/.config/rfkill-ctl/config.toml` when `XDG_CONFIG_HOME` is unset.
//! A missing file is not an error: every field has a default.
//!
//! ```toml
//! [device]
//! control_path = "/dev/rfkill"
//! sysfs_class_dir = "/sys/class/rfkill"
//!
//! [enumerate]
//! idle_timeout_ms = 10
//!
//! [logging]
//! log_level = "info"
//! ```
//!
//! # The idle timeout
//!
//! The control device has no "end of backlog" marker.  Right after open the
//! kernel queues one `add` record per registered switch; enumeration treats
//! "nothing new within `idle_timeout_ms`" as having seen them all.  Raise it
//! on slow or heavily loaded machines.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::enumerate::DEFAULT_IDLE_TIMEOUT;
use crate::infrastructure::device::{ControlDevice, DEFAULT_CONTROL_PATH};
use crate::infrastructure::sysfs::{SysfsNames, DEFAULT_SYSFS_CLASS_DIR};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RfkillConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub enumerate: EnumerateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the control device and sysfs attributes live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Path of the rfkill control device.
    #[serde(default = "default_control_path")]
    pub control_path: PathBuf,
    /// Directory holding one `rfkill<N>` entry per switch.
    #[serde(default = "default_sysfs_class_dir")]
    pub sysfs_class_dir: PathBuf,
}

/// Device enumeration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumerateConfig {
    /// Quiet period after which the backlog of `add` events counts as drained.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_control_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONTROL_PATH)
}
fn default_sysfs_class_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SYSFS_CLASS_DIR)
}
fn default_idle_timeout_ms() -> u64 {
    DEFAULT_IDLE_TIMEOUT.as_millis() as u64
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            control_path: default_control_path(),
            sysfs_class_dir: default_sysfs_class_dir(),
        }
    }
}

impl Default for EnumerateConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl RfkillConfig {
    pub fn control_device(&self) -> ControlDevice {
        ControlDevice::new(&self.device.control_path)
    }

    pub fn sysfs_names(&self) -> SysfsNames {
        SysfsNames::new(&self.device.sysfs_class_dir)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.enumerate.idle_timeout_ms)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the per-user config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(base.join("rfkill-ctl").join("config.toml"))
}

/// Loads the per-user config, returning defaults if the file does not exist.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<RfkillConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads config from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<RfkillConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RfkillConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &RfkillConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
