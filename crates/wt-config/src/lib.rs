mod cgi_config;
mod concurrency_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod report_config;
mod request_config;
mod shutdown_config;
mod startup_config;
mod target_config;

#[cfg(test)]
mod tests;

pub use cgi_config::CgiConfig;
pub use concurrency_config::ConcurrencyConfig;
pub use config::HarnessConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use report_config::ReportConfig;
pub use request_config::RequestConfig;
pub use shutdown_config::ShutdownConfig;
pub use startup_config::StartupConfig;
pub use target_config::TargetConfig;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILENAME: &str = "webserv-tester.toml";
/// Environment variable naming an explicit settings file.
pub const SETTINGS_ENV_VAR: &str = "WT_SETTINGS";

const DEFAULT_EXECUTABLE: &str = "./webserv";
const DEFAULT_SERVER_CONFIG: &str = "location_test.conf";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CONTENT_ROOT: &str = "html";

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
