//! pankha-ipmi-ctl entry point: CLI dispatch over the iDRAC server facade.

mod app;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::debug;

use app::cli::{Args, Command, FanAction};
use app::logging::{init_tracing, resolve_filter};
use pankha_ipmi_ctl::config::persistence::load_settings;
use pankha_ipmi_ctl::Server;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(resolve_filter(args.log_level.as_deref()));

    let mut settings = load_settings(args.config.as_deref()).await?;
    if let Some(timeout) = args.timeout {
        settings.command_timeout_secs = timeout;
    }
    if args.dry_run {
        settings.dry_run = true;
    }
    settings.validate().context("Invalid --timeout")?;
    debug!("Settings: {:?}", settings);

    let server = Server::new(
        args.host.as_deref(),
        args.username.as_deref(),
        args.password.as_deref(),
        &settings,
    )
    .context("Could not resolve iDRAC credentials")?;

    let host = server.host().to_string();
    let (text, value) = match args.command {
        Command::Status => {
            let status = server.get_power_status().await?;
            (status.to_string(), json!({ "host": host, "power": status }))
        }
        Command::On { fan_speed } => {
            let out = server.power_on(fan_speed).await?;
            (out.clone(), json!({ "host": host, "action": "power_on", "fanSpeed": fan_speed, "output": out }))
        }
        Command::Off { soft } => {
            let (action, out) = if soft {
                ("power_off_soft", server.power_off_soft().await?)
            } else {
                ("power_off_hard", server.power_off_hard().await?)
            };
            (out.clone(), json!({ "host": host, "action": action, "output": out }))
        }
        Command::Cycle => {
            let out = server.power_cycle().await?;
            (out.clone(), json!({ "host": host, "action": "power_cycle", "output": out }))
        }
        Command::Reset => {
            let out = server.power_reset().await?;
            (out.clone(), json!({ "host": host, "action": "power_reset", "output": out }))
        }
        Command::Temp => {
            let temp = server.get_temp().await?;
            (temp.to_string(), json!({ "host": host, "ambientTemp": temp }))
        }
        Command::Fan { action } => match action {
            FanAction::Get => {
                let rpm = server.get_fan_speed().await?;
                (rpm.to_string(), json!({ "host": host, "fanRpm": rpm }))
            }
            FanAction::Auto => {
                let out = server.set_fan_speed_auto().await?;
                (out.clone(), json!({ "host": host, "action": "fan_auto", "output": out }))
            }
            FanAction::Set { pct } => {
                let out = server.set_fan_speed_manual(pct).await?;
                (out.clone(), json!({ "host": host, "action": "fan_manual", "fanSpeed": pct, "output": out }))
            }
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if !text.trim().is_empty() {
        println!("{}", text.trim_end());
    }

    Ok(())
}
