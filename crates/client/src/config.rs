//! Client configuration.

use std::time::Duration;

use thiserror::Error;

/// Default interval between session liveness checks.
pub const POLL_SESSION_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default upper bound for a single call to the authentication provider.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const POLL_INTERVAL_ENV: &str = "CSADMIN_SESSION_POLL_MS";
pub const REQUEST_TIMEOUT_ENV: &str = "CSADMIN_REQUEST_TIMEOUT_MS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive number of milliseconds, got '{value}'")]
    InvalidDuration { key: &'static str, value: String },
    #[error("{field} must be non-zero")]
    ZeroDuration { field: &'static str },
}

/// Timing of the client flows. Both durations are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    poll_interval: Duration,
    request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_SESSION_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            poll_interval: millis(&lookup, POLL_INTERVAL_ENV)?.unwrap_or(defaults.poll_interval),
            request_timeout: millis(&lookup, REQUEST_TIMEOUT_ENV)?
                .unwrap_or(defaults.request_timeout),
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Result<Self, ConfigError> {
        self.poll_interval = non_zero(poll_interval, "poll_interval")?;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Result<Self, ConfigError> {
        self.request_timeout = non_zero(request_timeout, "request_timeout")?;
        Ok(self)
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn non_zero(duration: Duration, field: &'static str) -> Result<Duration, ConfigError> {
    if duration.is_zero() {
        return Err(ConfigError::ZeroDuration { field });
    }
    Ok(duration)
}

fn millis<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        tracing::debug!(key, "not set; using default");
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Some(Duration::from_millis(ms))),
        _ => Err(ConfigError::InvalidDuration { key, value: raw }),
    }
}
