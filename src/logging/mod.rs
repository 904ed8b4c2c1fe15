//! Log file setup for the `tablestate` binary.
//!
//! Library code only emits `tracing` events. The binary routes them to a
//! file so the rendered grid on stdout stays clean.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot create log directory {dir:?}: {source}")]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path ends in `..`, a root, or a name that is not UTF-8.
    #[error("log path {0:?} does not name a file")]
    NotAFile(PathBuf),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Directory and file name of a log path, as the appender takes them.
#[derive(Debug, PartialEq, Eq)]
struct LogTarget<'a> {
    dir: &'a Path,
    file: &'a str,
}

impl<'a> LogTarget<'a> {
    fn resolve(path: &'a Path) -> Result<Self, LoggingError> {
        let not_a_file = || LoggingError::NotAFile(path.to_path_buf());
        let file = path.file_name().and_then(|n| n.to_str()).ok_or_else(not_a_file)?;
        let dir = path.parent().ok_or_else(not_a_file)?;
        Ok(Self { dir, file })
    }

    /// Create the directory unless the path is a bare file name.
    fn ensure_dir(&self) -> Result<(), LoggingError> {
        if self.dir.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(self.dir).map_err(|source| LoggingError::CreateDir {
            dir: self.dir.to_path_buf(),
            source,
        })
    }
}

/// `RUST_LOG` if it parses, otherwise [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber appending plain-text events to `log_path`.
///
/// # Errors
///
/// Fails when `log_path` does not name a file, its directory cannot be
/// created, or another subscriber got there first.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let target = LogTarget::resolve(log_path)?;
    target.ensure_dir()?;

    let writer = tracing_appender::rolling::never(target.dir, target.file);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}
