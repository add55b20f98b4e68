//! rfkill-ctl command-line entry point.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()              -- TOML file, then CLI/env overrides
//!  └─ tracing_subscriber init    -- RUST_LOG, else config log_level
//!  └─ subcommand dispatch
//!       ├─ list          -> list_devices() + sysfs names
//!       ├─ watch         -> Watcher until Ctrl+C or end of stream
//!       ├─ block/unblock -> ControlDevice::set_blocked / set_kind_blocked
//!       └─ unblock-all   -> UnblockAllUseCase
//! ```
//!
//! # Exit status
//!
//! Any error is reported through `anyhow` and exits non-zero.  Stopping a
//! `watch` with Ctrl+C is a normal exit.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rfkill_ctl::application::enumerate::list_devices;
use rfkill_ctl::application::unblock_all::UnblockAllUseCase;
use rfkill_ctl::infrastructure::storage::config::{load_config, load_config_from, RfkillConfig};
use rfkill_ctl::infrastructure::{ControlDevice, SystemRadios, Watcher};
use rfkill_core::{Event, Kind, Operation};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "rfkill-ctl",
    about = "Inspect, watch, and toggle Linux rfkill radio switches",
    version
)]
struct Cli {
    /// Config file to read instead of the per-user default.
    #[arg(long, global = true, env = "RFKILL_CTL_CONFIG")]
    config: Option<PathBuf>,

    /// Path of the rfkill control device.
    #[arg(long, global = true, env = "RFKILL_CTL_DEVICE")]
    device: Option<PathBuf>,

    /// Quiet period, in milliseconds, that ends device enumeration.
    #[arg(long, global = true)]
    idle_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the currently registered switches.
    List {
        /// Print one JSON object per line.
        #[arg(long)]
        json: bool,
    },
    /// Print events as they happen until interrupted.
    Watch {
        /// Only show these operations (add, del, change, change-all).
        #[arg(long = "op", value_name = "OP")]
        ops: Vec<Operation>,
        /// Print one JSON object per line.
        #[arg(long)]
        json: bool,
    },
    /// Soft-block a device index or every device of a kind.
    Block { target: Target },
    /// Lift the soft block from a device index or every device of a kind.
    Unblock { target: Target },
    /// Unblock every soft-blocked switch, one at a time.
    UnblockAll,
}

/// Either one device by index or a whole radio kind.
#[derive(Debug, Clone, Copy)]
enum Target {
    Index(u32),
    Kind(Kind),
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<u32>() {
            return Ok(Target::Index(index));
        }
        s.parse::<Kind>()
            .map(Target::Kind)
            .map_err(|_| format!("expected a device index or radio type, got {s:?}"))
    }
}

/// One line of `list --json` output.
#[derive(Serialize)]
struct DeviceRow<'a> {
    #[serde(flatten)]
    event: &'a Event,
    name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging is not up yet, so a config problem is held until it is.
    let (config, config_err) = match &cli.config {
        Some(path) => (
            load_config_from(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None,
        ),
        None => match load_config() {
            Ok(cfg) => (cfg, None),
            Err(e) => (RfkillConfig::default(), Some(e)),
        },
    };
    let config = apply_overrides(config, &cli);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    if let Some(e) = config_err {
        warn!("failed to load config; using defaults: {e}");
    }
    debug!(?config, "effective configuration");

    let device = config.control_device();

    match cli.command {
        Command::List { json } => list(&config, &device, json).await,
        Command::Watch { ops, json } => watch(&device, ops, json).await,
        Command::Block { target } => set_target(&device, target, true),
        Command::Unblock { target } => set_target(&device, target, false),
        Command::UnblockAll => {
            let radios = Arc::new(SystemRadios::new(device.clone(), config.sysfs_names()));
            let names = UnblockAllUseCase::new(radios)
                .run(&device, config.idle_timeout(), |name| {
                    println!("unblocking: {name}");
                })
                .await
                .context("unblock-all failed")?;
            info!(count = names.len(), "unblock-all finished");
            Ok(())
        }
    }
}

fn apply_overrides(mut config: RfkillConfig, cli: &Cli) -> RfkillConfig {
    if let Some(path) = &cli.device {
        config.device.control_path = path.clone();
    }
    if let Some(ms) = cli.idle_timeout_ms {
        config.enumerate.idle_timeout_ms = ms;
    }
    config
}

async fn list(config: &RfkillConfig, device: &ControlDevice, json: bool) -> anyhow::Result<()> {
    let devices = list_devices(device, config.idle_timeout())
        .await
        .context("failed to enumerate rfkill devices")?;
    let names = config.sysfs_names();

    if !json {
        println!("{:>3}  {:<10} {:<12} {:<5} {:<5}", "ID", "TYPE", "DEVICE", "SOFT", "HARD");
    }
    for ev in &devices {
        // The switch may have vanished between enumeration and lookup.
        let name = match names.device_name(ev.index) {
            Ok(name) => Some(name),
            Err(e) => {
                debug!("no name for device {}: {e}", ev.index);
                None
            }
        };
        if json {
            println!("{}", serde_json::to_string(&DeviceRow { event: ev, name })?);
        } else {
            println!(
                "{:>3}  {:<10} {:<12} {:<5} {:<5}",
                ev.index,
                ev.kind,
                name.as_deref().unwrap_or("-"),
                blocked_label(ev.is_soft_blocked()),
                blocked_label(ev.is_hard_blocked()),
            );
        }
    }
    Ok(())
}

async fn watch(device: &ControlDevice, ops: Vec<Operation>, json: bool) -> anyhow::Result<()> {
    let mut watcher = Watcher::open(device, ops)
        .with_context(|| format!("failed to watch {}", device.path().display()))?;
    info!("watching {}; press Ctrl+C to stop", device.path().display());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("shutdown signal received");
                break;
            }
            next = watcher.recv() => match next {
                Some(ev) if json => println!("{}", serde_json::to_string(&ev)?),
                Some(ev) => println!("{ev}"),
                None => break,
            },
        }
    }

    watcher.close().await?;
    match watcher.error() {
        Some(e) if !e.is_normal_end() => Err(e.clone()).context("watch stopped"),
        _ => Ok(()),
    }
}

fn set_target(device: &ControlDevice, target: Target, blocked: bool) -> anyhow::Result<()> {
    match target {
        Target::Index(index) => device.set_blocked(index, blocked)?,
        Target::Kind(Kind::Unknown(raw)) => bail!("cannot address unknown radio type {raw}"),
        Target::Kind(kind) => device.set_kind_blocked(kind, blocked)?,
    }
    Ok(())
}

fn blocked_label(blocked: bool) -> &'static str {
    if blocked {
        "yes"
    } else {
        "no"
    }
}
