//! Credential resolution: explicit argument, then environment, then default.
//! Every function takes the env lookup as a parameter so resolution stays pure;
//! pass [`std_env`] in production.

use tracing::info;

use crate::config::types::*;
use crate::error::{IpmiError, Result};

/// Process environment lookup. Empty values count as unset.
pub fn std_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Return `explicit` if non-empty, else the value of `env_fallback`,
/// else fail naming the variable.
pub fn resolve_arg_or_env<F>(explicit: Option<&str>, env_fallback: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(explicit)
        .or_else(|| lookup(env_fallback).filter(|v| !v.is_empty()))
        .ok_or_else(|| IpmiError::EnvNotSupplied {
            variable: env_fallback.to_string(),
        })
}

/// BMC address resolved from an argument or `IDRAC_IP`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub address: String,
}

impl Host {
    pub fn resolve<F>(address: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            address: resolve_arg_or_env(address, IDRAC_ADDRESS_ENV, lookup)?,
        })
    }

    pub fn to_args(&self) -> Vec<String> {
        vec!["-H".to_string(), self.address.clone()]
    }
}

/// Login resolved from arguments or `IDRAC_USERNAME` / `IDRAC_PASSWORD`, no defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCredentials {
    pub username: String,
    pub password: Secret,
}

impl HostCredentials {
    pub fn resolve<F>(username: Option<&str>, password: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = resolve_arg_or_env(username, IDRAC_USERNAME_ENV, &lookup)?;
        let password = resolve_arg_or_env(password, IDRAC_PASSWORD_ENV, &lookup)?;
        Ok(Self {
            username,
            password: Secret::new(password),
        })
    }

    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-U".to_string(),
            self.username.clone(),
            "-P".to_string(),
            self.password.expose().to_string(),
        ]
    }
}

/// Resolve the full login used by `Server`.
///
/// The host comes from the argument or `IDRAC_HOST` and has no default.
/// Username and password fall back to `IDRAC_USERNAME` / `IDRAC_PASSWORD`
/// and then to the factory `root` / `calvin`.
pub fn resolve_server_credentials<F>(
    host: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    lookup: F,
) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let host = non_empty(host)
        .or_else(|| lookup(IDRAC_HOST_ENV))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| IpmiError::CredentialsMissing {
            host_var: IDRAC_HOST_ENV.to_string(),
            username_var: IDRAC_USERNAME_ENV.to_string(),
            password_var: IDRAC_PASSWORD_ENV.to_string(),
        })?;
    let username = non_empty(username)
        .or_else(|| lookup(IDRAC_USERNAME_ENV))
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
    let password = non_empty(password)
        .or_else(|| lookup(IDRAC_PASSWORD_ENV))
        .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

    let credentials = Credentials::new(host, username, password);
    info!("{}", credentials.status_line());
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_explicit_value_wins_over_env() {
        let lookup = env(&[("IDRAC_IP", "10.0.0.1")]);
        assert_eq!(resolve_arg_or_env(Some("10.0.0.9"), "IDRAC_IP", &lookup).unwrap(), "10.0.0.9");
        assert_eq!(resolve_arg_or_env(Some("10.0.0.9"), "IDRAC_IP", env(&[])).unwrap(), "10.0.0.9");
    }

    #[test]
    fn test_empty_or_missing_explicit_falls_back_to_env() {
        let lookup = env(&[("IDRAC_IP", "10.0.0.1")]);
        assert_eq!(resolve_arg_or_env(None, "IDRAC_IP", &lookup).unwrap(), "10.0.0.1");
        assert_eq!(resolve_arg_or_env(Some(""), "IDRAC_IP", &lookup).unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_missing_everywhere_names_variable() {
        let err = resolve_arg_or_env(None, "IDRAC_IP", env(&[])).unwrap_err();
        match err {
            IpmiError::EnvNotSupplied { variable } => assert_eq!(variable, "IDRAC_IP"),
            other => panic!("unexpected error: {other:?}"),
        }
        // Set-but-empty is the same as unset
        assert!(resolve_arg_or_env(None, "IDRAC_IP", env(&[("IDRAC_IP", "")])).is_err());
    }

    #[test]
    fn test_host_helpers_use_low_level_names() {
        let lookup = env(&[
            ("IDRAC_IP", "10.0.0.2"),
            ("IDRAC_USERNAME", "admin"),
            ("IDRAC_PASSWORD", "s3cret"),
        ]);
        let host = Host::resolve(None, &lookup).unwrap();
        assert_eq!(host.to_args(), vec!["-H", "10.0.0.2"]);

        let creds = HostCredentials::resolve(None, None, &lookup).unwrap();
        assert_eq!(creds.to_args(), vec!["-U", "admin", "-P", "s3cret"]);

        // No defaults on this path
        let err = HostCredentials::resolve(Some("admin"), None, env(&[])).unwrap_err();
        assert!(err.to_string().contains("IDRAC_PASSWORD"));
    }

    #[test]
    fn test_server_credentials_defaults() {
        let creds = resolve_server_credentials(None, None, None, env(&[("IDRAC_HOST", "idrac.lan")])).unwrap();
        assert_eq!(creds.address(), "idrac.lan");
        assert_eq!(creds.username(), "root");
        assert_eq!(creds.password().expose(), "calvin");
    }

    #[test]
    fn test_server_credentials_prefer_args_then_env() {
        let lookup = env(&[
            ("IDRAC_HOST", "idrac.lan"),
            ("IDRAC_USERNAME", "ops"),
            ("IDRAC_PASSWORD", "from-env"),
        ]);
        let creds = resolve_server_credentials(Some("10.1.1.1"), None, Some("from-arg"), &lookup).unwrap();
        assert_eq!(creds.address(), "10.1.1.1");
        assert_eq!(creds.username(), "ops");
        assert_eq!(creds.password().expose(), "from-arg");
    }

    #[test]
    fn test_server_credentials_require_host() {
        // IDRAC_IP belongs to the low-level helpers and is not consulted here
        let err = resolve_server_credentials(None, Some("root"), Some("calvin"), env(&[("IDRAC_IP", "10.0.0.1")]))
            .unwrap_err();
        assert!(matches!(err, IpmiError::CredentialsMissing { .. }));
        assert!(err.to_string().contains("IDRAC_HOST"));
    }
}
