use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_GRACEFUL_TIMEOUT_SECS: u64 = 1;
pub const MAX_GRACEFUL_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_GRACEFUL_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long the process group gets after SIGTERM before SIGKILL
    pub graceful_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            graceful_timeout_secs: DEFAULT_GRACEFUL_TIMEOUT_SECS,
        }
    }
}

impl ShutdownConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_GRACEFUL_TIMEOUT_SECS..=MAX_GRACEFUL_TIMEOUT_SECS)
            .contains(&self.graceful_timeout_secs)
        {
            return Err(ConfigError::lifecycle(format!(
                "shutdown.graceful_timeout_secs must be {}-{}, got {}",
                MIN_GRACEFUL_TIMEOUT_SECS, MAX_GRACEFUL_TIMEOUT_SECS, self.graceful_timeout_secs
            )));
        }

        Ok(())
    }

    pub fn graceful_timeout(&self) -> Duration {
        Duration::from_secs(self.graceful_timeout_secs)
    }
}
