//! ipmitool subprocess executor.
//! Every invocation goes over LAN (`-I lanplus`) to the BMC named in the credentials.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, trace};

use crate::config::types::{ControllerSettings, Credentials};
use crate::error::{IpmiError, Result};

/// One ipmitool call: fixed LAN prefix plus the command tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpmiInvocation {
    credentials: Credentials,
    tokens: Vec<String>,
}

impl IpmiInvocation {
    /// Split `cmd` on spaces into tokens. Runs of spaces produce no empty tokens.
    pub fn new(credentials: &Credentials, cmd: &str) -> Self {
        Self {
            credentials: credentials.clone(),
            tokens: cmd.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Command tokens joined back with single spaces.
    pub fn command(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn host(&self) -> &str {
        self.credentials.address()
    }

    /// Full argument list, password included.
    pub fn args(&self) -> Vec<String> {
        self.build_args(self.credentials.password().expose().to_string())
    }

    /// Same as [`args`](Self::args) with the password masked, for logs.
    pub fn redacted_args(&self) -> Vec<String> {
        self.build_args(self.credentials.password().redacted())
    }

    fn build_args(&self, password: String) -> Vec<String> {
        let mut args = vec![
            "-I".to_string(),
            "lanplus".to_string(),
            "-H".to_string(),
            self.credentials.address().to_string(),
            "-U".to_string(),
            self.credentials.username().to_string(),
            "-P".to_string(),
            password,
        ];
        args.extend(self.tokens.iter().cloned());
        args
    }
}

/// Runs an invocation and returns its stdout as text.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &IpmiInvocation) -> Result<String>;
}

/// Runs the real ipmitool binary.
#[derive(Debug, Clone)]
pub struct IpmitoolRunner {
    binary: String,
    timeout: Duration,
    dry_run: bool,
}

impl IpmitoolRunner {
    pub fn new(settings: &ControllerSettings) -> Self {
        Self {
            binary: settings.ipmitool_path.clone(),
            timeout: settings.command_timeout(),
            dry_run: settings.dry_run,
        }
    }
}

impl Default for IpmitoolRunner {
    fn default() -> Self {
        Self::new(&ControllerSettings::default())
    }
}

#[async_trait]
impl CommandRunner for IpmitoolRunner {
    async fn run(&self, invocation: &IpmiInvocation) -> Result<String> {
        if self.dry_run {
            info!("[DRY RUN] Would execute: {} {}", self.binary, invocation.redacted_args().join(" "));
            return Ok(String::new());
        }

        debug!("Executing: ipmitool {}", invocation.command());
        trace!("Executing: {} {:?}", self.binary, invocation.redacted_args());

        let child = tokio::process::Command::new(&self.binary)
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| IpmiError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        // On timeout the future owning the child is dropped, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| IpmiError::Spawn {
                binary: self.binary.clone(),
                source,
            })?,
            Err(_) => return Err(IpmiError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(IpmiError::ToolFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}
