use std::path::PathBuf;
use thiserror::Error;

/// Raised while building [`crate::config::Config`]; aborts service construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing Twilio credentials: {0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid {name} '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// The issue payload argument could not be turned into an issue record.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Issue payload is empty")]
    Empty,

    #[error("Input is not valid JSON: {0}")]
    InvalidInlineJson(#[source] serde_json::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{} is a directory, not a JSON file", .0.display())]
    Directory(PathBuf),

    #[error("Could not read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {} contains invalid JSON: {source}", path.display())]
    InvalidFileJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Input is neither valid JSON nor an existing file: {0}")]
    NotJsonOrFile(String),

    #[error("Issue payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Issue payload has an unexpected shape: {0}")]
    InvalidShape(#[source] serde_json::Error),
}

/// Everything that can stop a CLI action before a send is attempted.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Unexpected error: {0}")]
    Internal(String),
}
