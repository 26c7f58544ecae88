//! Deploy Report
//!
//! What a successful pipeline run produced. Failures travel through
//! `GantryError` instead.

use crate::domain::ports::ArchiveInfo;
use crate::domain::Release;

/// Result of a successful deploy
#[derive(Debug, Clone)]
pub struct DeployReport {
    /// The release that is now live
    pub release: Release,
    /// Archive produced in archive mode (None in synchronize mode)
    pub archive: Option<ArchiveInfo>,
    /// Tags removed by retention cleanup
    pub pruned: Vec<String>,
}

impl DeployReport {
    pub fn pruned_count(&self) -> usize {
        self.pruned.len()
    }
}
