//! Run configuration read from the environment once at start-up.
//!
//! Empty variables count as unset. Values that are present but malformed are
//! rejected instead of silently replaced by a default.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::transport::DEFAULT_TIMEOUT;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQ_RATE: u32 = 1000;
pub const DEFAULT_VUS: usize = 50;
pub const DEFAULT_MAX_VUS: usize = 100;
pub const DEFAULT_DURATION: &str = "1m";
pub const DEFAULT_CLOUD_PROJECT_ID: u64 = 5505295;
pub const DEFAULT_CLOUD_NAME: &str = "Ecommerce";
pub const DEFAULT_PROBE_ITERATIONS: usize = 10;

/// Opaque reporting identity handed to the harness as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudReport {
    pub project_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseConfig {
    pub base_url: String,
    /// Target requests per second across all workers.
    pub req_rate: u32,
    pub pre_allocated_vus: usize,
    pub max_vus: usize,
    pub duration: Duration,
    pub cloud: CloudReport,
}

impl BrowseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let req_rate = positive(&lookup, "K6_REQ_RATE", DEFAULT_REQ_RATE)?;
        let pre_allocated_vus = positive(&lookup, "K6_VUS", DEFAULT_VUS)?;
        let max_vus = positive(&lookup, "K6_MAX_VUS", DEFAULT_MAX_VUS)?;
        let duration = duration(&lookup, "K6_DURATION", DEFAULT_DURATION)?;
        let cloud = CloudReport {
            project_id: number(&lookup, "CLOUD_PROJECT_ID", DEFAULT_CLOUD_PROJECT_ID)?,
            name: lookup("CLOUD_NAME").unwrap_or_else(|| DEFAULT_CLOUD_NAME.to_owned()),
        };

        Ok(Self {
            base_url,
            req_rate,
            pre_allocated_vus,
            max_vus,
            duration,
            cloud,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub base_url: String,
    pub iterations: usize,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            base_url: lookup("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            iterations: positive(&lookup, "PROBE_ITERATIONS", DEFAULT_PROBE_ITERATIONS)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

pub(crate) fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

pub(crate) fn number<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

pub(crate) fn positive<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default + PartialEq,
{
    let value = number(lookup, var, default)?;
    if value == T::default() {
        return Err(ConfigError::Zero { var });
    }
    Ok(value)
}

fn duration<F>(lookup: &F, var: &'static str, default: &str) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(var).unwrap_or_else(|| default.to_owned());
    humantime::parse_duration(value.trim())
        .map_err(|source| ConfigError::InvalidDuration { var, value, source })
}
