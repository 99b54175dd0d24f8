use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures that prevent a session from starting. Always fatal.
#[derive(Error, Debug)]
pub enum StartError {
    #[error("Server executable not found at {path} {location}")]
    MissingExecutable {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Server config file not found at {path} {location}")]
    MissingConfig {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Port {port} is already in use {location}")]
    PortInUse { port: u16, location: ErrorLocation },

    #[error("Failed to spawn {executable}: {source} {location}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to open server log {path}: {source} {location}")]
    ServerLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Server process terminated immediately (exit code {code:?}) {location}")]
    ImmediateExit {
        code: Option<i32>,
        location: ErrorLocation,
    },

    #[error("Server not responding after {attempts} attempts {location}")]
    Unresponsive { attempts: u32, location: ErrorLocation },

    #[error("Failed to build HTTP client: {message} {location}")]
    Client {
        message: String,
        location: ErrorLocation,
    },
}

impl StartError {
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::MissingExecutable { .. } => "Build the server first (e.g. run `make`).",
            Self::MissingConfig { .. } => "Pass an existing config file as the first argument.",
            Self::PortInUse { .. } => {
                "Another process is listening on the port. \
                 Stop it or set target.require_free_port = false."
            }
            Self::ImmediateExit { .. } => {
                "The server exited during startup. Run it by hand with the same config."
            }
            Self::Unresponsive { .. } => {
                "The server never answered. Check the port in its config matches."
            }
            Self::ServerLog { .. } => "Check that target.server_log points to a writable file.",
            Self::Spawn { .. } | Self::Client { .. } => "Check the logs for details.",
        }
    }
}

impl From<reqwest::Error> for StartError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::Client {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CheckError> for StartError {
    #[track_caller]
    fn from(err: CheckError) -> Self {
        Self::Client {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type StartResult<T> = std::result::Result<T, StartError>;

/// Failures inside a single check. Never escape the executor.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Request to {url} timed out {location}")]
    Timeout { url: String, location: ErrorLocation },

    #[error("Connection to {url} failed: {message} {location}")]
    Connection {
        url: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP error: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Malformed response: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Fixture setup failed for {path}: {source} {location}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Check panicked: {message}")]
    Panicked { message: String },
}

impl CheckError {
    /// Classify a reqwest failure against the URL it was sent to
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        let location = ErrorLocation::from(Location::caller());
        if err.is_timeout() {
            CheckError::Timeout {
                url: url.to_string(),
                location,
            }
        } else if err.is_connect() {
            CheckError::Connection {
                url: url.to_string(),
                message: err.to_string(),
                location,
            }
        } else {
            CheckError::Http {
                source: err,
                location,
            }
        }
    }

    #[track_caller]
    pub fn timeout(url: &str) -> Self {
        CheckError::Timeout {
            url: url.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn connection<E: std::fmt::Display>(url: &str, err: E) -> Self {
        CheckError::Connection {
            url: url.to_string(),
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        CheckError::MalformedResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn fixture(path: PathBuf, source: std::io::Error) -> Self {
        CheckError::Fixture {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for CheckError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type CheckResult<T> = std::result::Result<T, CheckError>;

/// Problems while stopping the server. Logged, never fatal.
#[derive(Error, Debug)]
pub enum ShutdownError {
    #[error("Failed to send {signal} to process group {pgid}: {source} {location}")]
    Signal {
        signal: &'static str,
        pgid: i32,
        #[source]
        source: nix::Error,
        location: ErrorLocation,
    },

    #[error("Failed to wait for server process: {source} {location}")]
    Wait {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for ShutdownError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Wait {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
