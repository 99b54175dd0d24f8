use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_PROBE_ATTEMPTS: u32 = 1;
pub const MAX_PROBE_ATTEMPTS: u32 = 60;
pub const DEFAULT_PROBE_ATTEMPTS: u32 = 5;

pub const MIN_PROBE_INTERVAL_MS: u64 = 10;
pub const MAX_PROBE_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_PROBE_INTERVAL_MS: u64 = 1_000;

pub const MIN_PROBE_TIMEOUT_MS: u64 = 10;
pub const MAX_PROBE_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2_000;

pub const MAX_STARTUP_GRACE_MS: u64 = 60_000;
pub const DEFAULT_STARTUP_GRACE_MS: u64 = 0;

/// Readiness probing after the server is spawned.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Number of GET attempts before giving up
    pub probe_attempts: u32,
    /// Pause between attempts in milliseconds
    pub probe_interval_ms: u64,
    /// Timeout of a single attempt in milliseconds
    pub probe_timeout_ms: u64,
    /// Delay before the first attempt in milliseconds
    pub grace_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            probe_attempts: DEFAULT_PROBE_ATTEMPTS,
            probe_interval_ms: DEFAULT_PROBE_INTERVAL_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            grace_ms: DEFAULT_STARTUP_GRACE_MS,
        }
    }
}

impl StartupConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_PROBE_ATTEMPTS..=MAX_PROBE_ATTEMPTS).contains(&self.probe_attempts) {
            return Err(ConfigError::lifecycle(format!(
                "startup.probe_attempts must be {}-{}, got {}",
                MIN_PROBE_ATTEMPTS, MAX_PROBE_ATTEMPTS, self.probe_attempts
            )));
        }

        if !(MIN_PROBE_INTERVAL_MS..=MAX_PROBE_INTERVAL_MS).contains(&self.probe_interval_ms) {
            return Err(ConfigError::lifecycle(format!(
                "startup.probe_interval_ms must be {}-{}, got {}",
                MIN_PROBE_INTERVAL_MS, MAX_PROBE_INTERVAL_MS, self.probe_interval_ms
            )));
        }

        if !(MIN_PROBE_TIMEOUT_MS..=MAX_PROBE_TIMEOUT_MS).contains(&self.probe_timeout_ms) {
            return Err(ConfigError::lifecycle(format!(
                "startup.probe_timeout_ms must be {}-{}, got {}",
                MIN_PROBE_TIMEOUT_MS, MAX_PROBE_TIMEOUT_MS, self.probe_timeout_ms
            )));
        }

        if self.grace_ms > MAX_STARTUP_GRACE_MS {
            return Err(ConfigError::lifecycle(format!(
                "startup.grace_ms must be at most {}, got {}",
                MAX_STARTUP_GRACE_MS, self.grace_ms
            )));
        }

        Ok(())
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}
