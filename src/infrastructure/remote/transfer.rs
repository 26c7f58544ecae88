//! Transfer strategy selection
//!
//! Tree synchronization uses rsync; single-archive upload uses scp. Both
//! are probed once so a missing binary surfaces as a clear error instead
//! of a confusing command failure mid-pipeline.

use std::path::Path;

use crate::domain::ports::RemoteError;

use super::rsync::RsyncTransfer;
use super::scp::ScpTransfer;

/// Strategy for moving local bytes to the remote host
pub trait TransferStrategy {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    /// Copy `local` (a file, or a directory for tree strategies) into
    /// `remote_path` on `host`
    fn transfer(&self, local: &Path, host: &str, remote_path: &str) -> Result<(), RemoteError>;
}

/// The strategy for whole-tree synchronization
pub fn tree_strategy() -> Result<RsyncTransfer, RemoteError> {
    let strategy = RsyncTransfer;
    if !strategy.is_available() {
        return Err(RemoteError::Transfer(
            "rsync is not installed; synchronize mode requires it".to_string(),
        ));
    }
    Ok(strategy)
}

/// The strategy for single-file upload
pub fn upload_strategy() -> Result<ScpTransfer, RemoteError> {
    let strategy = ScpTransfer;
    if !strategy.is_available() {
        return Err(RemoteError::Transfer(
            "scp is not installed or not in PATH".to_string(),
        ));
    }
    Ok(strategy)
}
