//! Error types for Gantry
//!
//! One `thiserror` taxonomy shared by every pipeline stage and list item:
//! the driver aborts on the first error and surfaces it through the public
//! entry point rather than only logging it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Gantry operations
pub type GantryResult<T> = Result<T, GantryError>;

/// Main error type for Gantry operations
#[derive(Error, Debug)]
pub enum GantryError {
    /// Could not establish the remote session. Fatal: the pipeline aborts
    /// without attempting a close.
    #[error("connection to '{host}' failed: {message}")]
    Connection { host: String, message: String },

    /// A remote command exited non-zero
    #[error("remote command failed: `{command}`: {stderr}")]
    RemoteCommand { command: String, stderr: String },

    /// Archive transfer to the remote host failed
    #[error("upload of {local} failed: {message}")]
    Upload { local: PathBuf, message: String },

    /// Archive type is not one of the supported kinds
    #[error("unsupported archive type '{kind}' - expected 'tar' or 'zip'")]
    UnsupportedArchiveType { kind: String },

    /// Local archive creation failed
    #[error("archiving failed: {0}")]
    Archive(String),

    /// A user hook returned an error at one of the pipeline checkpoints
    #[error("hook '{phase}' failed: {message}")]
    Hook { phase: String, message: String },

    /// Invalid or unreadable configuration
    #[error("configuration error in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Another deploy is already running against this project
    #[error("deploy lock {path} is held by another process")]
    LockHeld { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GantryError {
    /// Connection failures skip the best-effort close on abort.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, GantryError::Connection { .. })
    }
}
