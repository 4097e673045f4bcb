//! Command-line argument definitions (clap).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pankha-ipmi-ctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Power, fan and temperature control for Dell iDRAC hosts via ipmitool", long_about = None)]
pub struct Args {
    // === Connection ===
    /// iDRAC address (falls back to IDRAC_HOST)
    #[arg(short = 'H', long, global = true, help_heading = "Connection")]
    pub host: Option<String>,

    /// iDRAC user (falls back to IDRAC_USERNAME, then root)
    #[arg(short = 'U', long, global = true, help_heading = "Connection")]
    pub username: Option<String>,

    /// iDRAC password (falls back to IDRAC_PASSWORD, then calvin)
    #[arg(short = 'P', long, global = true, help_heading = "Connection")]
    pub password: Option<String>,

    // === Execution ===
    /// Settings file (JSON). Defaults to settings.json next to the binary if present
    #[arg(short = 'c', long, global = true, help_heading = "Execution")]
    pub config: Option<PathBuf>,

    /// Per-command timeout in seconds, overrides the settings file
    #[arg(short = 't', long, global = true, help_heading = "Execution")]
    pub timeout: Option<f64>,

    /// Log ipmitool commands instead of running them
    #[arg(long = "dry-run", global = true, help_heading = "Execution")]
    pub dry_run: bool,

    // === Output ===
    /// Set log level (TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL)
    #[arg(long = "log-level", global = true, help_heading = "Output")]
    pub log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Output")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show chassis power state (ON/OFF)
    Status,
    /// Power on, optionally setting a manual fan speed after boot
    On {
        /// Fan speed percentage (1-100) to apply after power on
        #[arg(short = 'f', long = "fan-speed")]
        fan_speed: Option<u32>,
    },
    /// Power off (hard by default)
    Off {
        /// Graceful ACPI shutdown instead of a hard power off
        #[arg(long)]
        soft: bool,
    },
    /// Power cycle
    Cycle,
    /// Warm reset
    Reset,
    /// Show ambient temperature
    Temp,
    /// Fan control
    Fan {
        #[command(subcommand)]
        action: FanAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum FanAction {
    /// Show the highest fan RPM
    Get,
    /// Return fans to BMC automatic control
    Auto,
    /// Set all fans to a fixed percentage
    Set {
        /// Fan speed percentage (1-100)
        pct: u32,
    },
}
