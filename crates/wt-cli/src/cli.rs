use std::path::PathBuf;

use clap::Parser;
use wt_config::{HarnessConfig, LogLevel};
use wt_harness::CategoryKind;

#[derive(Parser, Debug)]
#[command(name = "webserv-tester")]
#[command(about = "Integration test harness for an HTTP/1.1 server with CGI support")]
#[command(version)]
pub struct Cli {
    /// Config file passed to the server (default: location_test.conf)
    pub(crate) config: Option<PathBuf>,

    /// Port the server listens on (default: 8080)
    pub(crate) port: Option<u16>,

    /// Harness settings file (TOML)
    #[arg(long, value_name = "PATH")]
    pub(crate) settings: Option<PathBuf>,

    /// Server executable to launch
    #[arg(long, value_name = "PATH")]
    pub(crate) executable: Option<PathBuf>,

    /// Directory the server serves files from
    #[arg(long, value_name = "DIR")]
    pub(crate) content_root: Option<PathBuf>,

    /// Only run the named category (repeatable)
    #[arg(long = "category", value_name = "NAME")]
    pub(crate) categories: Vec<CategoryKind>,

    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub(crate) log_level: Option<LogLevel>,
}

impl Cli {
    /// Command-line values win over settings file and environment.
    pub(crate) fn apply_overrides(&self, config: &mut HarnessConfig) {
        if let Some(ref path) = self.config {
            config.target.config = path.clone();
        }
        if let Some(port) = self.port {
            config.target.port = port;
        }
        if let Some(ref path) = self.executable {
            config.target.executable = path.clone();
        }
        if let Some(ref dir) = self.content_root {
            config.target.content_root = dir.clone();
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}
