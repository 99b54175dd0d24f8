use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to open log file {path}: {source} {location}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to initialize logger: {source} {location}")]
    Logger {
        #[source]
        source: log::SetLoggerError,
        location: ErrorLocation,
    },

    #[error("Failed to register signal handlers: {source} {location}")]
    Signals {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn log_file(path: PathBuf, source: std::io::Error) -> Self {
        Self::LogFile {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn signals(source: std::io::Error) -> Self {
        Self::Signals {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<log::SetLoggerError> for CliError {
    #[track_caller]
    fn from(source: log::SetLoggerError) -> Self {
        Self::Logger {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
