//! Error types shared by the store, config and state layers.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted data.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation on the store or config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file itself is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value exists under `key` but does not have the expected shape
    #[error("Malformed value under '{key}': {reason}")]
    Malformed { key: String, reason: String },

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
