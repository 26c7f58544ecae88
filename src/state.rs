//! Deploy lock
//!
//! One deploy or removal runs per invocation; the advisory lock extends
//! that guarantee across processes sharing a project directory. The lock
//! is released when the guard drops.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{GantryError, GantryResult};

#[derive(Debug)]
pub struct DeployLock {
    file: File,
    path: PathBuf,
}

impl DeployLock {
    /// Acquire the project-level deploy lock, failing fast if another
    /// process holds it.
    pub fn acquire(project_dir: &Path) -> GantryResult<Self> {
        let dir = project_dir.join(".gantry");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("deploy.lock");

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| GantryError::LockHeld { path: path.clone() })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
