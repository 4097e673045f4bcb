//! Credential and controller settings structs with their defaults.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{IpmiError, Result};

/// Env variables read by the low-level `Host` / `HostCredentials` helpers.
pub const IDRAC_ADDRESS_ENV: &str = "IDRAC_IP";
pub const IDRAC_USERNAME_ENV: &str = "IDRAC_USERNAME";
pub const IDRAC_PASSWORD_ENV: &str = "IDRAC_PASSWORD";

/// Env variable read by `Server` construction for the host.
pub const IDRAC_HOST_ENV: &str = "IDRAC_HOST";

/// Factory iDRAC login.
pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_PASSWORD: &str = "calvin";

/// A password that never prints its contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// Use only when building the ipmitool argument list.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One asterisk per character.
    pub fn redacted(&self) -> String {
        "*".repeat(self.len())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", self.redacted())
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Resolved login for one BMC. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    address: String,
    username: String,
    password: Secret,
}

impl Credentials {
    pub fn new(address: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: Secret::new(password),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }

    /// Status line shown after resolution, password masked.
    pub fn status_line(&self) -> String {
        format!(
            "[IPMI] - ({}) - User: {}, Password: {}",
            self.address,
            self.username,
            self.password.redacted()
        )
    }
}

/// Knobs for how commands are executed. Never holds credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Name or path of the ipmitool binary
    pub ipmitool_path: String,
    /// Upper bound for a single ipmitool run, in seconds
    pub command_timeout_secs: f64,
    /// Pause between `power on` and applying a manual fan speed
    pub power_on_fan_delay_secs: f64,
    /// Log commands instead of running them
    pub dry_run: bool,
}

impl ControllerSettings {
    /// Reject durations that are negative, not finite, or beyond `Duration::MAX`.
    pub fn validate(&self) -> Result<()> {
        checked_duration("command_timeout_secs", self.command_timeout_secs)?;
        checked_duration("power_on_fan_delay_secs", self.power_on_fan_delay_secs)?;
        Ok(())
    }

    /// Saturates on values `validate` would reject: NaN and negatives give zero,
    /// infinite or oversized values give `Duration::MAX`.
    pub fn command_timeout(&self) -> Duration {
        saturating_duration(self.command_timeout_secs)
    }

    pub fn power_on_fan_delay(&self) -> Duration {
        saturating_duration(self.power_on_fan_delay_secs)
    }
}

fn checked_duration(name: &'static str, secs: f64) -> Result<Duration> {
    if secs < 0.0 {
        return Err(IpmiError::InvalidDuration { name, value: secs });
    }
    Duration::try_from_secs_f64(secs).map_err(|_| IpmiError::InvalidDuration { name, value: secs })
}

fn saturating_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            ipmitool_path: "ipmitool".to_string(),
            command_timeout_secs: 30.0,
            power_on_fan_delay_secs: 2.0,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_never_prints_value() {
        let secret = Secret::new("calvin");
        assert_eq!(secret.redacted(), "******");
        assert_eq!(format!("{}", secret), "******");
        assert_eq!(format!("{:?}", secret), "Secret(******)");
        assert_eq!(secret.expose(), "calvin");
    }

    #[test]
    fn test_status_line_masks_password() {
        let creds = Credentials::new("192.168.1.120", "root", "hunter22");
        let line = creds.status_line();
        assert_eq!(line, "[IPMI] - (192.168.1.120) - User: root, Password: ********");
        assert!(!line.contains("hunter22"));
        assert!(!format!("{:?}", creds).contains("hunter22"));
    }

    #[test]
    fn test_out_of_range_durations_do_not_panic() {
        let settings = ControllerSettings {
            command_timeout_secs: f64::INFINITY,
            power_on_fan_delay_secs: 1e30,
            ..ControllerSettings::default()
        };
        assert_eq!(settings.command_timeout(), Duration::MAX);
        assert_eq!(settings.power_on_fan_delay(), Duration::MAX);

        let settings = ControllerSettings {
            command_timeout_secs: f64::NAN,
            power_on_fan_delay_secs: -3.0,
            ..ControllerSettings::default()
        };
        assert_eq!(settings.command_timeout(), Duration::ZERO);
        assert_eq!(settings.power_on_fan_delay(), Duration::ZERO);
    }

    #[test]
    fn test_validate_rejects_unusable_durations() {
        assert!(ControllerSettings::default().validate().is_ok());

        let cases = [
            (f64::INFINITY, 2.0, "command_timeout_secs"),
            (1e30, 2.0, "command_timeout_secs"),
            (f64::NAN, 2.0, "command_timeout_secs"),
            (30.0, -1.0, "power_on_fan_delay_secs"),
            (30.0, 1e30, "power_on_fan_delay_secs"),
        ];
        for (timeout, delay, field) in cases {
            let settings = ControllerSettings {
                command_timeout_secs: timeout,
                power_on_fan_delay_secs: delay,
                ..ControllerSettings::default()
            };
            match settings.validate() {
                Err(IpmiError::InvalidDuration { name, .. }) => assert_eq!(name, field),
                other => panic!("expected InvalidDuration for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: ControllerSettings = serde_json::from_str(r#"{"dry_run": true}"#).unwrap();
        assert!(settings.dry_run);
        assert_eq!(settings.ipmitool_path, "ipmitool");
        assert_eq!(settings.command_timeout(), Duration::from_secs(30));
        assert_eq!(settings.power_on_fan_delay(), Duration::from_secs(2));
    }
}
