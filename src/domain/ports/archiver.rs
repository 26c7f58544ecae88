//! Archiver Capability Port
//!
//! Compresses a local tree into a single archive file the pipeline can
//! upload. The concrete format (tar, zip) lives in infrastructure; the
//! pipeline only sees this contract.

use std::path::PathBuf;

/// Error during archive creation
#[derive(Debug, Clone)]
pub enum ArchiveError {
    /// Source tree missing or unreadable
    Source(String),
    /// The external compression tool failed or is unavailable
    Tool(String),
    /// Staging or writing the archive failed
    Io(String),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(msg) => write!(f, "source error: {}", msg),
            Self::Tool(msg) => write!(f, "tool error: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ArchiveError {}

/// What to compress
#[derive(Debug, Clone)]
pub struct ArchiveSpec {
    /// Local tree to package
    pub source: PathBuf,
    /// File name of the archive to produce (e.g. "release.tar.gz")
    pub archive_name: String,
    /// Gitignore-style patterns excluded from the archive
    pub exclude: Vec<String>,
}

/// A produced archive
#[derive(Debug, Clone)]
pub struct ArchiveInfo {
    /// Where the archive was written locally
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// sha256 of the archive contents, "sha256:<hex>"
    pub digest: String,
}

impl ArchiveInfo {
    /// Human-readable size for event output
    pub fn size_description(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
        let mut size = self.size as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", self.size, UNITS[0])
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }
}

/// Trait for archive producers
pub trait Archiver {
    /// File name this archiver will produce for `base_name`
    /// (e.g. "release" -> "release.tar.gz")
    fn archive_file_name(&self, base_name: &str) -> String;

    /// Compress the spec's source tree into a local archive
    fn compress(&self, spec: &ArchiveSpec) -> Result<ArchiveInfo, ArchiveError>;
}

impl<A: Archiver + ?Sized> Archiver for Box<A> {
    fn archive_file_name(&self, base_name: &str) -> String {
        (**self).archive_file_name(base_name)
    }

    fn compress(&self, spec: &ArchiveSpec) -> Result<ArchiveInfo, ArchiveError> {
        (**self).compress(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_description_picks_sane_units() {
        let info = |size| ArchiveInfo {
            path: PathBuf::from("/tmp/a.tar.gz"),
            size,
            digest: "sha256:0".to_string(),
        };
        assert_eq!(info(512).size_description(), "512 B");
        assert_eq!(info(2048).size_description(), "2.0 KiB");
        assert_eq!(info(5 * 1024 * 1024).size_description(), "5.0 MiB");
    }
}
