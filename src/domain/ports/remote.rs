//! Remote Capability Port
//!
//! Abstracts the connected remote session the pipeline drives. The split
//! into `RemoteControl` and `RemoteSession` is deliberate: hooks receive
//! only the restricted `RemoteControl` surface, so the session lifecycle
//! (synchronize, prune, close) can never be driven from user code.

use std::path::Path;

/// Error during remote operations
#[derive(Debug, Clone)]
pub enum RemoteError {
    /// Could not establish or keep the connection
    Connection(String),
    /// A remote command exited non-zero
    CommandFailed { command: String, stderr: String },
    /// A file transfer failed
    Transfer(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "connection error: {}", msg),
            Self::CommandFailed { command, stderr } => {
                write!(f, "command `{}` failed: {}", command, stderr)
            }
            Self::Transfer(msg) => write!(f, "transfer error: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Result of a remote command
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Restricted remote surface exposed to hooks through the context.
///
/// Everything here is a single remote round-trip that completes before the
/// call returns; issuing the next command before the previous one finished
/// is impossible by construction.
pub trait RemoteControl {
    /// Run one command on the remote host
    fn exec(&mut self, command: &str) -> Result<ExecOutput, RemoteError>;

    /// Run several commands, strictly in order, stopping at the first
    /// failure
    fn exec_multiple(&mut self, commands: &[String]) -> Result<(), RemoteError> {
        for command in commands {
            self.exec(command)?;
        }
        Ok(())
    }

    /// Copy a local file into a remote directory
    fn upload(&mut self, local: &Path, remote_dir: &str) -> Result<(), RemoteError>;

    /// Create (or replace) a symlink at `link_path` pointing to `target`
    fn create_symlink(&mut self, target: &str, link_path: &str) -> Result<(), RemoteError>;

    /// Change permission bits on a remote path
    fn chmod(&mut self, path: &str, mode: &str) -> Result<(), RemoteError>;

    /// Create a remote directory (and parents)
    fn create_folder(&mut self, path: &str) -> Result<(), RemoteError>;
}

/// Full session surface driven by the pipeline itself.
pub trait RemoteSession: RemoteControl {
    /// Mirror a local tree into the release directory, keeping a
    /// persistent synced copy for delta transfers
    fn synchronize(
        &mut self,
        local: &Path,
        release_path: &str,
        synced_folder: &str,
    ) -> Result<(), RemoteError>;

    /// Delete all but the lexicographically-last `keep` releases under
    /// `root`. Returns the tags that were deleted.
    fn prune_old_releases(&mut self, root: &str, keep: usize)
        -> Result<Vec<String>, RemoteError>;

    /// Recursively delete a remote tree
    fn remove_tree(&mut self, path: &str) -> Result<(), RemoteError>;

    /// Tear down the connection. Idempotent.
    fn close(&mut self) -> Result<(), RemoteError>;
}

/// Produces exactly one live session per pipeline run.
pub trait RemoteConnector {
    type Session: RemoteSession;

    fn connect(&self) -> Result<Self::Session, RemoteError>;
}
