//! Rsync Transfer Strategy
//!
//! Used by synchronize mode: only changed portions of the tree cross the
//! wire, against the persistent synchronized folder.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::RemoteError;

use super::transfer::TransferStrategy;

pub struct RsyncTransfer;

impl RsyncTransfer {
    /// Check if rsync is installed and available
    pub fn check_available() -> bool {
        Command::new("rsync")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl TransferStrategy for RsyncTransfer {
    fn name(&self) -> &'static str {
        "rsync"
    }

    fn is_available(&self) -> bool {
        Self::check_available()
    }

    fn transfer(&self, local: &Path, host: &str, remote_path: &str) -> Result<(), RemoteError> {
        let remote_dest = format!("{}:{}/", host, remote_path.trim_end_matches('/'));

        let mut cmd = Command::new("rsync");
        cmd.arg("-az")
            .arg("--delete")
            .arg("-e")
            .arg("ssh")
            .arg(format!("{}/", local.display())) // trailing slash = copy contents
            .arg(&remote_dest)
            .stdin(Stdio::inherit()) // Allow password input
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let output = cmd
            .output()
            .map_err(|e| RemoteError::Transfer(e.to_string()))?;

        if !output.status.success() {
            return Err(RemoteError::Transfer(format!(
                "rsync to {} failed: {}",
                remote_dest,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsync_transfer_name() {
        let transfer = RsyncTransfer;
        assert_eq!(transfer.name(), "rsync");
    }

    #[test]
    fn check_available_does_not_panic() {
        let _ = RsyncTransfer::check_available();
    }
}
