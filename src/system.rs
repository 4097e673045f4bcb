//! ipmitool process execution and output parsing.

pub mod executor;
pub mod parser;

#[cfg(test)]
pub(crate) mod mock_runner;
