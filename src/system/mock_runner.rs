//! Recording runner for tests: canned stdout per command, no processes.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{IpmiError, Result};
use crate::system::executor::{CommandRunner, IpmiInvocation};

#[derive(Default)]
pub struct MockRunner {
    responses: HashMap<String, String>,
    failing: HashSet<String>,
    sent: Mutex<Vec<IpmiInvocation>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `cmd` with `stdout`. Unknown commands reply with "".
    pub fn respond(mut self, cmd: &str, stdout: &str) -> Self {
        self.responses.insert(cmd.to_string(), stdout.to_string());
        self
    }

    /// Make `cmd` fail as if ipmitool exited non-zero.
    pub fn fail(mut self, cmd: &str) -> Self {
        self.failing.insert(cmd.to_string());
        self
    }

    /// Commands sent so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|i| i.command()).collect()
    }

    pub fn invocations(&self) -> Vec<IpmiInvocation> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, invocation: &IpmiInvocation) -> Result<String> {
        let cmd = invocation.command();
        self.sent.lock().unwrap().push(invocation.clone());

        if self.failing.contains(&cmd) {
            return Err(IpmiError::ToolFailed {
                code: Some(1),
                stderr: "Error: Unable to establish IPMI v2 / RMCP+ session".to_string(),
            });
        }
        Ok(self.responses.get(&cmd).cloned().unwrap_or_default())
    }
}
