//! SSH Remote Session
//!
//! Implements the remote ports by shelling out to the system ssh client,
//! one process per operation, with rsync/scp strategies for transfers.
//! There is no persistent channel: the "session" models the lifecycle
//! contract (nothing before connect, nothing after close), which is what
//! the pipeline depends on.

mod rsync;
mod scp;
mod transfer;

pub use rsync::RsyncTransfer;
pub use scp::ScpTransfer;
pub use transfer::{tree_strategy, upload_strategy, TransferStrategy};

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::{
    ExecOutput, RemoteConnector, RemoteControl, RemoteError, RemoteSession,
};

/// Connector for a single host ("host" or "user@host")
pub struct SshConnector {
    host: String,
}

impl SshConnector {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl RemoteConnector for SshConnector {
    type Session = SshSession;

    /// Probe the host with a no-op command; a failure here is a
    /// connection failure, not a command failure.
    fn connect(&self) -> Result<SshSession, RemoteError> {
        let output = Command::new("ssh")
            .arg(&self.host)
            .arg("true")
            .stdin(Stdio::inherit()) // Allow password input
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RemoteError::Connection(e.to_string()))?;

        if !output.status.success() {
            return Err(RemoteError::Connection(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(SshSession {
            host: self.host.clone(),
            closed: false,
        })
    }
}

/// One logical session against one host
pub struct SshSession {
    host: String,
    closed: bool,
}

impl SshSession {
    fn shell_quote(s: &str) -> String {
        format!("'{}'", s.replace('\'', "'\\''"))
    }

    fn run_ssh(&self, command: &str) -> Result<ExecOutput, RemoteError> {
        if self.closed {
            return Err(RemoteError::Connection(
                "session already closed".to_string(),
            ));
        }

        let output = Command::new("ssh")
            .arg(&self.host)
            .arg(command)
            .stdin(Stdio::inherit())
            .output()
            .map_err(|e| RemoteError::Connection(e.to_string()))?;

        if !output.status.success() {
            return Err(RemoteError::CommandFailed {
                command: command.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

impl RemoteControl for SshSession {
    fn exec(&mut self, command: &str) -> Result<ExecOutput, RemoteError> {
        self.run_ssh(command)
    }

    fn upload(&mut self, local: &Path, remote_dir: &str) -> Result<(), RemoteError> {
        if self.closed {
            return Err(RemoteError::Connection(
                "session already closed".to_string(),
            ));
        }
        upload_strategy()?.transfer(local, &self.host, remote_dir)
    }

    fn create_symlink(&mut self, target: &str, link_path: &str) -> Result<(), RemoteError> {
        let parent = link_path
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default();
        // ln -sfn replaces an existing link in one step, which is what
        // makes the current-link swap the atomic go-live point.
        let command = if parent.is_empty() {
            format!(
                "ln -sfn {} {}",
                Self::shell_quote(target),
                Self::shell_quote(link_path)
            )
        } else {
            format!(
                "mkdir -p {} && ln -sfn {} {}",
                Self::shell_quote(&parent),
                Self::shell_quote(target),
                Self::shell_quote(link_path)
            )
        };
        self.run_ssh(&command).map(|_| ())
    }

    fn chmod(&mut self, path: &str, mode: &str) -> Result<(), RemoteError> {
        let command = format!("chmod {} {}", mode, Self::shell_quote(path));
        self.run_ssh(&command).map(|_| ())
    }

    fn create_folder(&mut self, path: &str) -> Result<(), RemoteError> {
        let command = format!("mkdir -p {}", Self::shell_quote(path));
        self.run_ssh(&command).map(|_| ())
    }
}

impl RemoteSession for SshSession {
    fn synchronize(
        &mut self,
        local: &Path,
        release_path: &str,
        synced_folder: &str,
    ) -> Result<(), RemoteError> {
        self.create_folder(synced_folder)?;
        tree_strategy()?.transfer(local, &self.host, synced_folder)?;
        // Hard-copy the synced tree into the release so later releases
        // cannot mutate this one through the shared folder.
        let command = format!(
            "cp -a {}/. {}/",
            Self::shell_quote(synced_folder),
            Self::shell_quote(release_path)
        );
        self.run_ssh(&command).map(|_| ())
    }

    fn prune_old_releases(
        &mut self,
        root: &str,
        keep: usize,
    ) -> Result<Vec<String>, RemoteError> {
        let listing = self
            .run_ssh(&format!("ls -1 {}", Self::shell_quote(root)))?
            .stdout;
        let doomed = select_prune_targets(&listing, keep);
        for tag in &doomed {
            let command = format!("rm -rf {}/{}", Self::shell_quote(root), tag);
            self.run_ssh(&command)?;
        }
        Ok(doomed)
    }

    fn remove_tree(&mut self, path: &str) -> Result<(), RemoteError> {
        let command = format!("rm -rf {}", Self::shell_quote(path));
        self.run_ssh(&command).map(|_| ())
    }

    fn close(&mut self) -> Result<(), RemoteError> {
        self.closed = true;
        Ok(())
    }
}

/// Pure selection of retention victims: sort the listing, keep the
/// lexicographically-last `keep` entries.
pub fn select_prune_targets(listing: &str, keep: usize) -> Vec<String> {
    let mut tags: Vec<String> = listing
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    tags.sort();
    if tags.len() > keep {
        tags.truncate(tags.len() - keep);
        tags
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(SshSession::shell_quote("it's"), "'it'\\''s'");
        assert_eq!(SshSession::shell_quote("/srv/app"), "'/srv/app'");
    }

    #[test]
    fn select_prune_targets_keeps_last_n() {
        let listing = "t3\nt1\nt2\n";
        assert_eq!(select_prune_targets(listing, 2), vec!["t1"]);
        assert_eq!(select_prune_targets(listing, 1), vec!["t1", "t2"]);
    }

    #[test]
    fn select_prune_targets_with_enough_room_deletes_nothing() {
        assert_eq!(select_prune_targets("t1\nt2\n", 3), Vec::<String>::new());
        assert_eq!(select_prune_targets("", 1), Vec::<String>::new());
    }

    #[test]
    fn select_prune_targets_ignores_blank_lines() {
        assert_eq!(select_prune_targets("\nt1\n\nt2\n", 1), vec!["t1"]);
    }

    #[test]
    fn closed_session_refuses_commands() {
        let mut session = SshSession {
            host: "example.invalid".to_string(),
            closed: true,
        };
        assert!(matches!(
            session.exec("true"),
            Err(RemoteError::Connection(_))
        ));
    }
}
