//! Error types for iDRAC control.
//!
//! Messages never carry the BMC password.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum IpmiError {
    /// A value with no default could not be found as an argument or in the environment.
    #[error("Environment variable: {variable} not set.")]
    EnvNotSupplied { variable: String },

    #[error(
        "[IPMI] - Credentials were not supplied. Set {host_var}, {username_var} and {password_var} \
         as env variables, or pass them as arguments."
    )]
    CredentialsMissing {
        host_var: String,
        username_var: String,
        password_var: String,
    },

    #[error("The fanspeed pct should be an integer between 1-100, got {0}.")]
    InvalidFanSpeed(u32),

    /// A duration setting that is negative, not finite, or too large for a `Duration`.
    #[error("Invalid setting {name}: {value} seconds")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("[IPMI] - There was an error in the IPMI message, is ipmitool installed? (exit code {code:?}){}", fmt_stderr(.stderr))]
    ToolFailed { code: Option<i32>, stderr: String },

    #[error("[IPMI] - Failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[IPMI] - ipmitool did not finish within {0:?}")]
    Timeout(Duration),

    #[error("[IPMI] - ipmitool output is not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("[IPMI] - ({host}) - Could not find ambient temp")]
    AmbientNotFound { host: String },
}

fn fmt_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

pub type Result<T> = std::result::Result<T, IpmiError>;
