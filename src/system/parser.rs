//! Text scrapers for ipmitool output.
//! Each takes the raw stdout and returns a typed value; none of them touch the process.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TWO_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{2}").expect("valid regex"));
const AMBIENT: &str = "ambient";

static FAN_RPM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]{3,}) RPM").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerStatus {
    On,
    Off,
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerStatus::On => f.write_str("ON"),
            PowerStatus::Off => f.write_str("OFF"),
        }
    }
}

/// `power status` output: "off" anywhere (case-sensitive) means OFF, anything else ON.
pub fn parse_power_status(output: &str) -> PowerStatus {
    if output.contains("off") {
        PowerStatus::Off
    } else {
        PowerStatus::On
    }
}

/// Last line mentioning "ambient", any case.
pub fn find_ambient_line(output: &str) -> Option<&str> {
    output
        .split('\n')
        .filter(|line| line.to_ascii_lowercase().contains(AMBIENT))
        .last()
}

/// Ambient reading from `sdr type temperature` output.
///
/// `None` when no ambient line exists. Otherwise the first run of two digits
/// from the "ambient" label onwards, or 0 if there is none. The match is
/// fixed-width: readings below 10 or above 99, or other two-digit text between
/// the label and the reading, come out wrong.
pub fn parse_ambient_temp(output: &str) -> Option<u32> {
    let line = find_ambient_line(output)?;
    let start = line.to_ascii_lowercase().find(AMBIENT).unwrap_or(0);
    Some(
        TWO_DIGITS
            .find(&line[start..])
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0),
    )
}

/// Highest `NNN RPM` reading across all fans in `sdr type fan` output, 0 if none.
/// Readings past `u64::MAX` saturate rather than being dropped.
pub fn parse_max_fan_rpm(output: &str) -> u64 {
    FAN_RPM
        .captures_iter(output)
        .map(|c| c[1].parse::<u64>().unwrap_or(u64::MAX))
        .max()
        .unwrap_or(0)
}
