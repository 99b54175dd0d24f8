use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_REQUESTS: usize = 1;
pub const MAX_REQUESTS: usize = 10_000;
pub const DEFAULT_CONNECTIONS: usize = 5;
pub const DEFAULT_STRESS_REQUESTS: usize = 10;

pub const MIN_POOL_SIZE: usize = 1;
pub const MAX_POOL_SIZE: usize = 512;

pub const DEFAULT_PER_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const MAX_PER_REQUEST_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_MIN_SUCCESS_RATIO: f64 = 0.8;

pub const DEFAULT_SETTLE_MS: u64 = 1_000;
pub const MAX_SETTLE_MS: u64 = 60_000;

/// Burst sizes and the single success threshold shared by every burst.
///
/// A burst passes when `succeeded >= ceil(min_success_ratio * dispatched)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Requests (and workers) in the concurrent-connections check
    pub connections: usize,
    /// Requests (and workers) in the resilience burst
    pub stress_requests: usize,
    pub per_request_timeout_secs: u64,
    pub min_success_ratio: f64,
    /// Pause between the burst and the follow-up request, in milliseconds
    pub settle_ms: u64,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            connections: DEFAULT_CONNECTIONS,
            stress_requests: DEFAULT_STRESS_REQUESTS,
            per_request_timeout_secs: DEFAULT_PER_REQUEST_TIMEOUT_SECS,
            min_success_ratio: DEFAULT_MIN_SUCCESS_RATIO,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

impl ConcurrencyConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, value) in [
            ("concurrency.connections", self.connections),
            ("concurrency.stress_requests", self.stress_requests),
        ] {
            if !(MIN_REQUESTS..=MAX_REQUESTS).contains(&value) {
                return Err(ConfigError::concurrency(format!(
                    "{name} must be {MIN_REQUESTS}-{MAX_REQUESTS}, got {value}"
                )));
            }
        }

        if self.per_request_timeout_secs == 0
            || self.per_request_timeout_secs > MAX_PER_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::concurrency(format!(
                "concurrency.per_request_timeout_secs must be 1-{}, got {}",
                MAX_PER_REQUEST_TIMEOUT_SECS, self.per_request_timeout_secs
            )));
        }

        if !(self.min_success_ratio > 0.0 && self.min_success_ratio <= 1.0) {
            return Err(ConfigError::concurrency(format!(
                "concurrency.min_success_ratio must be in (0, 1], got {}",
                self.min_success_ratio
            )));
        }

        if self.settle_ms > MAX_SETTLE_MS {
            return Err(ConfigError::concurrency(format!(
                "concurrency.settle_ms must be at most {}, got {}",
                MAX_SETTLE_MS, self.settle_ms
            )));
        }

        Ok(())
    }

    /// Pool size for a burst of `requests`, clamped to the supported range.
    pub fn pool_size_for(&self, requests: usize) -> usize {
        requests.clamp(MIN_POOL_SIZE, MAX_POOL_SIZE)
    }

    /// Successes required for a burst of `dispatched` requests to pass.
    pub fn required_successes(&self, dispatched: usize) -> usize {
        (self.min_success_ratio * dispatched as f64).ceil() as usize
    }

    pub fn per_request_timeout(&self) -> Duration {
        Duration::from_secs(self.per_request_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
