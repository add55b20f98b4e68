//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file from the
//! per-user config directory, falls back to defaults when it does not exist,
//! and writes it back when asked to.

pub mod config;
