use crate::{
    CgiConfig, ConcurrencyConfig, ConfigError, ConfigErrorResult, DEFAULT_SETTINGS_FILENAME,
    LoggingConfig, ReportConfig, RequestConfig, SETTINGS_ENV_VAR, ShutdownConfig, StartupConfig,
    TargetConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    pub target: TargetConfig,
    pub startup: StartupConfig,
    pub shutdown: ShutdownConfig,
    pub requests: RequestConfig,
    pub concurrency: ConcurrencyConfig,
    pub cgi: CgiConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

impl HarnessConfig {
    /// Load settings.
    ///
    /// Resolution order:
    /// 1. `explicit` path (must exist)
    /// 2. `WT_SETTINGS` env var (must exist)
    /// 3. `./webserv-tester.toml` if present
    /// 4. Built-in defaults
    ///
    /// `WT_*` environment overrides are applied last. Does NOT validate;
    /// call validate() after load().
    pub fn load(explicit: Option<&Path>) -> ConfigErrorResult<Self> {
        let mut config = match Self::resolve_path(explicit)? {
            Some(path) => Self::load_toml(&path)?,
            None => HarnessConfig::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse settings from a TOML string, without env overrides.
    pub fn from_toml_str(contents: &str) -> ConfigErrorResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::Toml {
            path: PathBuf::from("<inline>"),
            source: e,
        })
    }

    fn resolve_path(explicit: Option<&Path>) -> ConfigErrorResult<Option<PathBuf>> {
        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(SETTINGS_ENV_VAR).ok().map(PathBuf::from));

        if let Some(path) = requested {
            if !path.is_file() {
                return Err(ConfigError::not_found(path));
            }
            return Ok(Some(path));
        }

        let local = PathBuf::from(DEFAULT_SETTINGS_FILENAME);
        Ok(local.is_file().then_some(local))
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate all sections.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.target.validate()?;
        self.startup.validate()?;
        self.shutdown.validate()?;
        self.requests.validate()?;
        self.concurrency.validate()?;
        self.cgi.validate()?;
        self.report.validate()?;
        Ok(())
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  target: {} {} on {}",
            self.target.executable.display(),
            self.target.config.display(),
            self.target.base_url()
        );
        info!(
            "  content root: {} (require free port: {})",
            self.target.content_root.display(),
            self.target.require_free_port
        );
        info!(
            "  startup: attempts={}, interval={}ms, timeout={}ms, grace={}ms",
            self.startup.probe_attempts,
            self.startup.probe_interval_ms,
            self.startup.probe_timeout_ms,
            self.startup.grace_ms
        );
        info!(
            "  shutdown: graceful={}s",
            self.shutdown.graceful_timeout_secs
        );
        info!(
            "  requests: timeout={}s, cgi={}s",
            self.requests.timeout_secs, self.requests.cgi_timeout_secs
        );
        info!(
            "  concurrency: connections={}, stress={}, min ratio={}",
            self.concurrency.connections,
            self.concurrency.stress_requests,
            self.concurrency.min_success_ratio
        );
        info!(
            "  report: ready>={}%, attention>={}%",
            self.report.ready_pass_rate, self.report.attention_pass_rate
        );
    }

    fn apply_env_overrides(&mut self) {
        // Target
        Self::apply_env_parse("WT_EXECUTABLE", &mut self.target.executable);
        Self::apply_env_parse("WT_SERVER_CONFIG", &mut self.target.config);
        Self::apply_env_string("WT_HOST", &mut self.target.host);
        Self::apply_env_parse("WT_PORT", &mut self.target.port);
        Self::apply_env_parse("WT_CONTENT_ROOT", &mut self.target.content_root);
        Self::apply_env_bool("WT_REQUIRE_FREE_PORT", &mut self.target.require_free_port);
        if let Ok(val) = std::env::var("WT_SERVER_LOG") {
            self.target.server_log = Some(PathBuf::from(val));
        }

        // Startup / shutdown
        Self::apply_env_parse("WT_PROBE_ATTEMPTS", &mut self.startup.probe_attempts);
        Self::apply_env_parse("WT_PROBE_INTERVAL_MS", &mut self.startup.probe_interval_ms);
        Self::apply_env_parse("WT_PROBE_TIMEOUT_MS", &mut self.startup.probe_timeout_ms);
        Self::apply_env_parse("WT_STARTUP_GRACE_MS", &mut self.startup.grace_ms);
        Self::apply_env_parse(
            "WT_SHUTDOWN_TIMEOUT_SECS",
            &mut self.shutdown.graceful_timeout_secs,
        );

        // Requests
        Self::apply_env_parse("WT_REQUEST_TIMEOUT_SECS", &mut self.requests.timeout_secs);
        Self::apply_env_parse("WT_CGI_TIMEOUT_SECS", &mut self.requests.cgi_timeout_secs);

        // Concurrency
        Self::apply_env_parse(
            "WT_CONCURRENT_CONNECTIONS",
            &mut self.concurrency.connections,
        );
        Self::apply_env_parse("WT_STRESS_REQUESTS", &mut self.concurrency.stress_requests);
        Self::apply_env_parse(
            "WT_MIN_SUCCESS_RATIO",
            &mut self.concurrency.min_success_ratio,
        );

        // Logging
        Self::apply_env_parse("WT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("WT_LOG_COLORED", &mut self.logging.colored);
        if let Ok(val) = std::env::var("WT_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(val));
        }
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
