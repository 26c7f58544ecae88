//! Scp Transfer Strategy
//!
//! Used by archive mode to push the single archive file into the release
//! directory. Present wherever an ssh client is.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::RemoteError;

use super::transfer::TransferStrategy;

pub struct ScpTransfer;

impl ScpTransfer {
    /// Check if scp is in PATH
    pub fn check_available() -> bool {
        // scp has no --version; any invocation error other than "not
        // found" still proves the binary exists.
        match Command::new("scp")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => true,
            Err(e) => e.kind() != std::io::ErrorKind::NotFound,
        }
    }
}

impl TransferStrategy for ScpTransfer {
    fn name(&self) -> &'static str {
        "scp"
    }

    fn is_available(&self) -> bool {
        Self::check_available()
    }

    fn transfer(&self, local: &Path, host: &str, remote_path: &str) -> Result<(), RemoteError> {
        let remote_dest = format!("{}:{}/", host, remote_path.trim_end_matches('/'));

        let output = Command::new("scp")
            .arg("-q")
            .arg(local)
            .arg(&remote_dest)
            .stdin(Stdio::inherit()) // Allow password input
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RemoteError::Transfer(e.to_string()))?;

        if !output.status.success() {
            return Err(RemoteError::Transfer(format!(
                "scp to {} failed: {}",
                remote_dest,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}
