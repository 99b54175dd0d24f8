use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CGI_TIMEOUT_SECS: u64 = 10;

pub const MIN_LARGE_HEADER_BYTES: usize = 1;
pub const MAX_LARGE_HEADER_BYTES: usize = 1024 * 1024;
pub const DEFAULT_LARGE_HEADER_BYTES: usize = 8192;

pub const MIN_LARGE_FILE_BYTES: usize = 1;
pub const MAX_LARGE_FILE_BYTES: usize = 64 * 1024 * 1024;
pub const DEFAULT_LARGE_FILE_BYTES: usize = 100_000;

/// Per-request limits for single-exchange checks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub timeout_secs: u64,
    /// CGI scripts fork an interpreter and get more time
    pub cgi_timeout_secs: u64,
    /// Size of the oversized header value sent by the protocol checks
    pub large_header_bytes: usize,
    /// Size of the fixture file served by the large-file check
    pub large_file_bytes: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cgi_timeout_secs: DEFAULT_CGI_TIMEOUT_SECS,
            large_header_bytes: DEFAULT_LARGE_HEADER_BYTES,
            large_file_bytes: DEFAULT_LARGE_FILE_BYTES,
        }
    }
}

impl RequestConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, value) in [
            ("requests.timeout_secs", self.timeout_secs),
            ("requests.cgi_timeout_secs", self.cgi_timeout_secs),
        ] {
            if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&value) {
                return Err(ConfigError::requests(format!(
                    "{name} must be {MIN_TIMEOUT_SECS}-{MAX_TIMEOUT_SECS}, got {value}"
                )));
            }
        }

        if !(MIN_LARGE_HEADER_BYTES..=MAX_LARGE_HEADER_BYTES).contains(&self.large_header_bytes) {
            return Err(ConfigError::requests(format!(
                "requests.large_header_bytes must be {}-{}, got {}",
                MIN_LARGE_HEADER_BYTES, MAX_LARGE_HEADER_BYTES, self.large_header_bytes
            )));
        }

        if !(MIN_LARGE_FILE_BYTES..=MAX_LARGE_FILE_BYTES).contains(&self.large_file_bytes) {
            return Err(ConfigError::requests(format!(
                "requests.large_file_bytes must be {}-{}, got {}",
                MIN_LARGE_FILE_BYTES, MAX_LARGE_FILE_BYTES, self.large_file_bytes
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cgi_timeout(&self) -> Duration {
        Duration::from_secs(self.cgi_timeout_secs)
    }
}
