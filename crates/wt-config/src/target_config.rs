use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CONTENT_ROOT, DEFAULT_EXECUTABLE, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_SERVER_CONFIG,
};

use std::path::PathBuf;

use serde::Deserialize;

const LOOPBACK_HOSTS: [&str; 3] = ["127.0.0.1", "localhost", "::1"];

/// The server-under-test and where it serves from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Path to the server binary
    pub executable: PathBuf,
    /// Config file handed to the server as its only argument
    pub config: PathBuf,
    pub host: String,
    pub port: u16,
    /// Directory the server serves files from; fixtures are created here
    pub content_root: PathBuf,
    /// Refuse to start when something already listens on `port`
    pub require_free_port: bool,
    /// Append the server's stdout/stderr here; discarded when unset
    pub server_log: Option<PathBuf>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            config: PathBuf::from(DEFAULT_SERVER_CONFIG),
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            require_free_port: true,
            server_log: None,
        }
    }
}

impl TargetConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.port == 0 {
            return Err(ConfigError::target(
                "target.port must be a concrete port, got 0",
            ));
        }

        // Traffic never leaves the loopback interface
        if !LOOPBACK_HOSTS.contains(&self.host.as_str()) {
            return Err(ConfigError::target(format!(
                "target.host must be one of {LOOPBACK_HOSTS:?}, got '{}'",
                self.host
            )));
        }

        if self.executable.as_os_str().is_empty() {
            return Err(ConfigError::target("target.executable cannot be empty"));
        }

        if self.config.as_os_str().is_empty() {
            return Err(ConfigError::target("target.config cannot be empty"));
        }

        if self.content_root.as_os_str().is_empty() {
            return Err(ConfigError::target("target.content_root cannot be empty"));
        }

        Ok(())
    }

    /// Base URL of the server-under-test, without a trailing slash.
    pub fn base_url(&self) -> String {
        self.base_url_for(self.port)
    }

    /// Base URL on the configured host with a different port.
    pub fn base_url_for(&self, port: u16) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}", self.host, port)
        } else {
            format!("http://{}:{}", self.host, port)
        }
    }
}
