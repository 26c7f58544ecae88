//! Archive producers
//!
//! Both archivers stage the source tree into a temporary directory first,
//! honoring the exclude patterns, then run the system tar/zip over the
//! staged copy. Staging keeps pattern handling in one place and means the
//! compression tool never sees excluded files at all.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use sha2::{Digest, Sha256};

use crate::config::ArchiveKind;
use crate::domain::ports::{ArchiveError, ArchiveInfo, ArchiveSpec, Archiver};

/// Archiver for the configured kind
pub fn archiver_for(kind: ArchiveKind) -> Box<dyn Archiver> {
    match kind {
        ArchiveKind::Tar => Box::new(TarArchiver),
        ArchiveKind::Zip => Box::new(ZipArchiver),
    }
}

pub struct TarArchiver;

pub struct ZipArchiver;

impl TarArchiver {
    pub fn check_available() -> bool {
        tool_available("tar", "--version")
    }
}

impl ZipArchiver {
    pub fn check_available() -> bool {
        // Info-ZIP's zip has no GNU-style --version; -h exits zero
        tool_available("zip", "-h")
    }
}

fn tool_available(tool: &str, probe_flag: &str) -> bool {
    Command::new(tool)
        .arg(probe_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

impl Archiver for TarArchiver {
    fn archive_file_name(&self, base_name: &str) -> String {
        format!("{}.tar.gz", base_name)
    }

    fn compress(&self, spec: &ArchiveSpec) -> Result<ArchiveInfo, ArchiveError> {
        if !Self::check_available() {
            return Err(ArchiveError::Tool("tar is not installed".to_string()));
        }

        let staging = stage_tree(spec)?;
        let output = archive_output_path(spec)?;

        let status = Command::new("tar")
            .arg("czf")
            .arg(&output)
            .arg("-C")
            .arg(staging.path())
            .arg(".")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ArchiveError::Tool(e.to_string()))?;

        if !status.success() {
            return Err(ArchiveError::Tool(format!(
                "tar exited with {:?}",
                status.code()
            )));
        }

        describe_archive(output)
    }
}

impl Archiver for ZipArchiver {
    fn archive_file_name(&self, base_name: &str) -> String {
        format!("{}.zip", base_name)
    }

    fn compress(&self, spec: &ArchiveSpec) -> Result<ArchiveInfo, ArchiveError> {
        if !Self::check_available() {
            return Err(ArchiveError::Tool("zip is not installed".to_string()));
        }

        let staging = stage_tree(spec)?;
        let output = archive_output_path(spec)?;

        // zip resolves "." against its working directory
        let status = Command::new("zip")
            .arg("-qr")
            .arg(&output)
            .arg(".")
            .current_dir(staging.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ArchiveError::Tool(e.to_string()))?;

        if !status.success() {
            return Err(ArchiveError::Tool(format!(
                "zip exited with {:?}",
                status.code()
            )));
        }

        describe_archive(output)
    }
}

/// The archive lands next to the source tree, under the configured name.
fn archive_output_path(spec: &ArchiveSpec) -> Result<PathBuf, ArchiveError> {
    let source = spec
        .source
        .canonicalize()
        .map_err(|e| ArchiveError::Source(format!("{}: {}", spec.source.display(), e)))?;
    Ok(source.join(&spec.archive_name))
}

/// Copy the source tree into a temp directory, skipping excluded paths
/// and any stale archive from a previous run.
fn stage_tree(spec: &ArchiveSpec) -> Result<tempfile::TempDir, ArchiveError> {
    if !spec.source.is_dir() {
        return Err(ArchiveError::Source(format!(
            "{} is not a directory",
            spec.source.display()
        )));
    }

    let staging = tempfile::tempdir().map_err(|e| ArchiveError::Io(e.to_string()))?;

    let mut overrides = OverrideBuilder::new(&spec.source);
    for pattern in &spec.exclude {
        // Leading '!' in override syntax means "exclude"
        overrides
            .add(&format!("!{}", pattern))
            .map_err(|e| ArchiveError::Source(format!("bad exclude pattern: {}", e)))?;
    }
    let overrides = overrides
        .build()
        .map_err(|e| ArchiveError::Source(e.to_string()))?;

    let walker = WalkBuilder::new(&spec.source)
        .overrides(overrides)
        .standard_filters(false)
        .hidden(false)
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| ArchiveError::Source(e.to_string()))?;
        let path = entry.path();
        let relative = match path.strip_prefix(&spec.source) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        if relative == Path::new(&spec.archive_name) {
            continue;
        }

        let target = staging.path().join(relative);
        if path.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| ArchiveError::Io(e.to_string()))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ArchiveError::Io(e.to_string()))?;
            }
            std::fs::copy(path, &target).map_err(|e| ArchiveError::Io(e.to_string()))?;
        }
    }

    Ok(staging)
}

fn describe_archive(path: PathBuf) -> Result<ArchiveInfo, ArchiveError> {
    let bytes = std::fs::read(&path).map_err(|e| ArchiveError::Io(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(ArchiveInfo {
        size: bytes.len() as u64,
        digest: format!("sha256:{:x}", hasher.finalize()),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn archive_file_names() {
        assert_eq!(TarArchiver.archive_file_name("release"), "release.tar.gz");
        assert_eq!(ZipArchiver.archive_file_name("release"), "release.zip");
    }

    #[test]
    fn stage_tree_copies_everything_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.php", "<?php");
        write(dir.path(), "src/app.php", "<?php");
        write(dir.path(), ".env", "SECRET=1");

        let spec = ArchiveSpec {
            source: dir.path().to_path_buf(),
            archive_name: "release.tar.gz".to_string(),
            exclude: Vec::new(),
        };
        let staging = stage_tree(&spec).unwrap();

        assert!(staging.path().join("index.php").is_file());
        assert!(staging.path().join("src/app.php").is_file());
        // Hidden files deploy too; this is a release tree, not a repo walk
        assert!(staging.path().join(".env").is_file());
    }

    #[test]
    fn stage_tree_honors_exclude_patterns() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.php", "<?php");
        write(dir.path(), "node_modules/dep/index.js", "x");
        write(dir.path(), "logs/app.log", "x");

        let spec = ArchiveSpec {
            source: dir.path().to_path_buf(),
            archive_name: "release.tar.gz".to_string(),
            exclude: vec!["node_modules".to_string(), "*.log".to_string()],
        };
        let staging = stage_tree(&spec).unwrap();

        assert!(staging.path().join("index.php").is_file());
        assert!(!staging.path().join("node_modules").exists());
        assert!(!staging.path().join("logs/app.log").exists());
    }

    #[test]
    fn stage_tree_skips_stale_archive() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.php", "<?php");
        write(dir.path(), "release.tar.gz", "old archive");

        let spec = ArchiveSpec {
            source: dir.path().to_path_buf(),
            archive_name: "release.tar.gz".to_string(),
            exclude: Vec::new(),
        };
        let staging = stage_tree(&spec).unwrap();

        assert!(!staging.path().join("release.tar.gz").exists());
    }

    #[test]
    fn stage_tree_rejects_missing_source() {
        let spec = ArchiveSpec {
            source: PathBuf::from("/nonexistent/tree"),
            archive_name: "release.tar.gz".to_string(),
            exclude: Vec::new(),
        };
        assert!(matches!(stage_tree(&spec), Err(ArchiveError::Source(_))));
    }

    #[test]
    fn tar_compress_produces_digest_and_size() {
        if !TarArchiver::check_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.php", "<?php echo 'hi';");

        let spec = ArchiveSpec {
            source: dir.path().to_path_buf(),
            archive_name: "release.tar.gz".to_string(),
            exclude: Vec::new(),
        };
        let info = TarArchiver.compress(&spec).unwrap();

        assert!(info.path.is_file());
        assert!(info.size > 0);
        assert!(info.digest.starts_with("sha256:"));
        assert_eq!(info.path.file_name().unwrap(), "release.tar.gz");
    }
}
