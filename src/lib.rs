//! Power, fan and temperature control for Dell iDRAC hosts.
//!
//! All BMC traffic goes through the `ipmitool` binary over LAN; this crate builds
//! the invocations, runs them and scrapes the text they print.

pub mod config;
pub mod error;
pub mod server;
pub mod system;

pub use config::types::{ControllerSettings, Credentials, Secret};
pub use error::{IpmiError, Result};
pub use server::Server;
pub use system::executor::{CommandRunner, IpmiInvocation, IpmitoolRunner};
pub use system::parser::PowerStatus;
