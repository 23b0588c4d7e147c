//! Error types for daylog

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised inside the record pipeline.
///
/// These never reach callers of [`Channel`](crate::Channel) operations; the
/// channel reports them through `tracing` and carries on.
#[derive(Error, Debug)]
pub enum LogError {
    /// Appending to the resolved log file failed
    #[error("Failed to append to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A channel name did not match any known kind
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// A configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using LogError
pub type LogResult<T> = Result<T, LogError>;
