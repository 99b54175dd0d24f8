use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{category} error: {message} {location}")]
    Generic {
        category: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Settings file not found: {path} {location}")]
    NotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    fn generic<S: Into<String>>(category: &'static str, message: S) -> Self {
        ConfigError::Generic {
            category,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a target (server-under-test) error
    #[track_caller]
    pub fn target<S: Into<String>>(message: S) -> Self {
        Self::generic("Target", message)
    }

    /// Create a startup/shutdown error
    #[track_caller]
    pub fn lifecycle<S: Into<String>>(message: S) -> Self {
        Self::generic("Lifecycle", message)
    }

    /// Create a request error
    #[track_caller]
    pub fn requests<S: Into<String>>(message: S) -> Self {
        Self::generic("Requests", message)
    }

    /// Create a concurrency error
    #[track_caller]
    pub fn concurrency<S: Into<String>>(message: S) -> Self {
        Self::generic("Concurrency", message)
    }

    /// Create a CGI error
    #[track_caller]
    pub fn cgi<S: Into<String>>(message: S) -> Self {
        Self::generic("Cgi", message)
    }

    /// Create a report error
    #[track_caller]
    pub fn report<S: Into<String>>(message: S) -> Self {
        Self::generic("Report", message)
    }

    /// Create a logging error
    #[track_caller]
    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::generic("Logging", message)
    }

    #[track_caller]
    pub fn not_found(path: PathBuf) -> Self {
        ConfigError::NotFound {
            path,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl serde::de::Error for ConfigError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ConfigError::generic("Serde", msg.to_string())
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
