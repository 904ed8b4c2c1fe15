//! Error types for tablestate.
//!
//! One `thiserror` enum per concern, composing into [`AppError`] via `From`
//! so the binary can use `?` end to end.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the `tablestate` binary
//!   - [`FetchError`] - Data source failures (transport, status, malformed payload)
//!   - [`PersistenceError`] - Store read/write failures
//!   - [`ConfigError`](crate::config::ConfigError) - Config file and validation failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failures
//!
//! # Recovery Strategy
//!
//! Inside the engine nothing is fatal. A fetch failure moves the table to the
//! `Error` phase and waits for an explicit refresh. Persistence failures are
//! logged and the mutation still applies. Values that fail coercion become null.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error of the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    #[error("Failed to load table data: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to persist table state: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a data request.
///
/// Reported to the error hook and recorded while the table sits in the
/// `Error` phase; recovery is a user-driven refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The endpoint answered with a failure status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// Status code reported by the endpoint.
        status: u16,
        /// Message body or reason phrase.
        message: String,
    },

    /// The response could not be read as `{ rows, filteredTotal }`.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A local data file could not be read.
    #[error("failed to read {path}: {reason}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Malformed(e.to_string())
    }
}

/// Failure of the persistence adapter.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        /// State file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path} is not a JSON object of strings: {reason}")]
    Decode {
        /// State file path.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    #[error("failed to encode table state: {0}")]
    Encode(#[from] serde_json::Error),

    /// A caller-supplied sink refused the snapshot.
    #[error("state sink rejected snapshot: {0}")]
    Rejected(String),
}
