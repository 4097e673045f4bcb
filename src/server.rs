//! Dell iDRAC server facade: power, fan and temperature operations over ipmitool.

use std::time::Duration;

use tracing::info;

use crate::config::resolver::{resolve_server_credentials, std_env};
use crate::config::types::{ControllerSettings, Credentials};
use crate::error::{IpmiError, Result};
use crate::system::executor::{CommandRunner, IpmiInvocation, IpmitoolRunner};
use crate::system::parser::{self, PowerStatus};

pub const CMD_POWER_STATUS: &str = "power status";
pub const CMD_POWER_ON: &str = "power on";
pub const CMD_POWER_OFF: &str = "power off";
pub const CMD_POWER_SOFT: &str = "power soft";
pub const CMD_POWER_CYCLE: &str = "power cycle";
pub const CMD_POWER_RESET: &str = "power reset";
pub const CMD_SDR_TEMPERATURE: &str = "sdr type temperature";
pub const CMD_SDR_FAN: &str = "sdr type fan";

/// Dell OEM: hand fan control back to the BMC.
pub const CMD_FAN_AUTO: &str = "raw 0x30 0x30 0x01 0x01";
/// Dell OEM: take manual fan control.
pub const CMD_FAN_MANUAL: &str = "raw 0x30 0x30 0x01 0x00";

/// Dell OEM set-speed for all fans, percentage as an unpadded hex byte (50 -> `0x32`).
pub fn fan_speed_command(pct: u8) -> String {
    format!("raw 0x30 0x30 0x02 0xff {:#x}", pct)
}

/// Accept 1..=100.
pub fn validate_fan_speed(pct: u32) -> Result<u8> {
    if (1..=100).contains(&pct) {
        Ok(pct as u8)
    } else {
        Err(IpmiError::InvalidFanSpeed(pct))
    }
}

/// One BMC with its resolved login.
pub struct Server<R: CommandRunner = IpmitoolRunner> {
    credentials: Credentials,
    runner: R,
    power_on_fan_delay: Duration,
}

impl Server<IpmitoolRunner> {
    /// Resolve credentials from arguments, then `IDRAC_HOST` / `IDRAC_USERNAME` /
    /// `IDRAC_PASSWORD`, then `root` / `calvin`. The host has no default.
    pub fn new(
        host: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
        settings: &ControllerSettings,
    ) -> Result<Self> {
        let credentials = resolve_server_credentials(host, username, password, std_env)?;
        Ok(Self::from_credentials(credentials, settings))
    }

    pub fn from_env(settings: &ControllerSettings) -> Result<Self> {
        Self::new(None, None, None, settings)
    }

    pub fn from_credentials(credentials: Credentials, settings: &ControllerSettings) -> Self {
        Self::with_runner(credentials, IpmitoolRunner::new(settings), settings)
    }
}

impl<R: CommandRunner> Server<R> {
    pub fn with_runner(credentials: Credentials, runner: R, settings: &ControllerSettings) -> Self {
        Self {
            credentials,
            runner,
            power_on_fan_delay: settings.power_on_fan_delay(),
        }
    }

    pub fn host(&self) -> &str {
        self.credentials.address()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run an arbitrary ipmitool command against the host and return its output.
    pub async fn do_cmd(&self, cmd: &str) -> Result<String> {
        let invocation = IpmiInvocation::new(&self.credentials, cmd);
        self.runner.run(&invocation).await
    }

    pub async fn get_power_status(&self) -> Result<PowerStatus> {
        let out = self.do_cmd(CMD_POWER_STATUS).await?;
        Ok(parser::parse_power_status(&out))
    }

    /// Power on, then optionally switch to a manual fan speed once the BMC settles.
    /// The percentage is checked before anything is sent.
    pub async fn power_on(&self, fan_speed_pct: Option<u32>) -> Result<String> {
        let fan_speed = fan_speed_pct.map(validate_fan_speed).transpose()?;

        info!("[IPMI] - ({}) - Powering on.", self.host());
        let out = self.do_cmd(CMD_POWER_ON).await?;

        if let Some(pct) = fan_speed {
            tokio::time::sleep(self.power_on_fan_delay).await;
            self.send_manual_fan_speed(pct).await?;
        }
        Ok(out)
    }

    pub async fn power_off_hard(&self) -> Result<String> {
        info!("[IPMI] - ({}) - Executing hard power off.", self.host());
        self.do_cmd(CMD_POWER_OFF).await
    }

    pub async fn power_off_soft(&self) -> Result<String> {
        info!("[IPMI] - ({}) - Executing graceful shutdown.", self.host());
        self.do_cmd(CMD_POWER_SOFT).await
    }

    pub async fn power_cycle(&self) -> Result<String> {
        info!("[IPMI] - ({}) - Executing power cycle.", self.host());
        self.do_cmd(CMD_POWER_CYCLE).await
    }

    pub async fn power_reset(&self) -> Result<String> {
        info!("[IPMI] - ({}) - Executing warm reset.", self.host());
        self.do_cmd(CMD_POWER_RESET).await
    }

    /// Ambient temperature in degrees C. See [`parser::parse_ambient_temp`] for its limits.
    pub async fn get_temp(&self) -> Result<u32> {
        let out = self.do_cmd(CMD_SDR_TEMPERATURE).await?;
        parser::parse_ambient_temp(&out).ok_or_else(|| IpmiError::AmbientNotFound {
            host: self.host().to_string(),
        })
    }

    pub async fn set_fan_speed_auto(&self) -> Result<String> {
        info!("[IPMI] - ({}) - Returning to auto fan control.", self.host());
        self.do_cmd(CMD_FAN_AUTO).await
    }

    /// Take manual control and set all fans to `fan_speed_pct`.
    /// Returns the output of the set-speed command.
    pub async fn set_fan_speed_manual(&self, fan_speed_pct: u32) -> Result<String> {
        let pct = validate_fan_speed(fan_speed_pct)?;
        self.send_manual_fan_speed(pct).await
    }

    async fn send_manual_fan_speed(&self, pct: u8) -> Result<String> {
        info!(
            "[IPMI] - ({}) - Activating manual fan control, fan speed: {}%.",
            self.host(),
            pct
        );
        self.do_cmd(CMD_FAN_MANUAL).await?;
        self.do_cmd(&fan_speed_command(pct)).await
    }

    /// Highest fan RPM reported by the BMC, 0 if none could be read.
    pub async fn get_fan_speed(&self) -> Result<u64> {
        let out = self.do_cmd(CMD_SDR_FAN).await?;
        Ok(parser::parse_max_fan_rpm(&out))
    }
}
