//! Configuration type definitions
//!
//! `ConfigFile` mirrors `gantry.toml` loosely (everything optional,
//! serde defaults); `validate` turns it into the immutable `Options` the
//! pipeline runs on. Validation is the only place a raw archive-type
//! string becomes a typed `ArchiveKind`, so an unsupported kind is
//! rejected long before any remote command is issued.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GantryError, GantryResult};

/// Transfer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    /// Compress locally, upload, unpack remotely
    #[default]
    Archive,
    /// rsync the tree into the release directory
    Synchronize,
}

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    Zip,
}

impl ArchiveKind {
    pub fn parse(kind: &str) -> GantryResult<Self> {
        match kind {
            "tar" => Ok(Self::Tar),
            "zip" => Ok(Self::Zip),
            other => Err(GantryError::UnsupportedArchiveType {
                kind: other.to_string(),
            }),
        }
    }
}

/// One entry of the share mapping.
///
/// Supports both the bare form:
///   [share]
///   logs = "logs"
///
/// And the descriptor form:
///   [share]
///   uploads = { symlink = "public/uploads", mode = "775" }
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ShareEntry {
    Bare(String),
    Descriptor {
        #[serde(default)]
        symlink: Option<String>,
        #[serde(default)]
        mode: Option<String>,
    },
}

/// Resolved share target: where the link goes and whether to chmod it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTarget {
    /// Release-relative symlink path
    pub symlink: String,
    /// chmod mode, applied only when explicitly configured
    pub mode: Option<String>,
}

impl ShareEntry {
    /// Bare entries link under the folder key itself; descriptors may
    /// override the link name and add a mode.
    fn resolve(&self, folder_key: &str) -> ShareTarget {
        match self {
            Self::Bare(symlink) => ShareTarget {
                symlink: symlink.clone(),
                mode: None,
            },
            Self::Descriptor { symlink, mode } => ShareTarget {
                symlink: symlink.clone().unwrap_or_else(|| folder_key.to_string()),
                mode: mode.clone(),
            },
        }
    }
}

/// Transfer section
#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
    #[serde(default)]
    pub mode: DeployMode,

    #[serde(default = "default_archive_type")]
    pub archive_type: String,

    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub delete_local_archive: bool,

    /// Persistent folder used as the rsync target in synchronize mode
    #[serde(default = "default_synchronized_folder")]
    pub synchronized_folder: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            mode: DeployMode::default(),
            archive_type: default_archive_type(),
            archive_name: default_archive_name(),
            exclude: Vec::new(),
            delete_local_archive: false,
            synchronized_folder: default_synchronized_folder(),
        }
    }
}

fn default_synchronized_folder() -> String {
    "synchronized".to_string()
}

fn default_archive_type() -> String {
    "tar".to_string()
}

fn default_archive_name() -> String {
    "release".to_string()
}

/// Release layout section
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseConfig {
    #[serde(default = "default_releases_folder")]
    pub releases_folder: String,

    #[serde(default = "default_shared_folder")]
    pub shared_folder: String,

    #[serde(default = "default_current_link")]
    pub current_release_link: String,

    #[serde(default = "default_releases_to_keep")]
    pub releases_to_keep: usize,

    #[serde(default)]
    pub create: Vec<String>,

    #[serde(default)]
    pub make_writable: Vec<String>,

    #[serde(default)]
    pub make_executable: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            releases_folder: default_releases_folder(),
            shared_folder: default_shared_folder(),
            current_release_link: default_current_link(),
            releases_to_keep: default_releases_to_keep(),
            create: Vec::new(),
            make_writable: Vec::new(),
            make_executable: Vec::new(),
        }
    }
}

fn default_releases_folder() -> String {
    "releases".to_string()
}

fn default_shared_folder() -> String {
    "shared".to_string()
}

fn default_current_link() -> String {
    "current".to_string()
}

fn default_releases_to_keep() -> usize {
    3
}

/// Raw `gantry.toml` contents
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub deploy_path: Option<String>,

    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    /// folder-key -> symlink name | { symlink, mode }. BTreeMap keeps the
    /// iteration order deterministic across runs.
    #[serde(default)]
    pub share: BTreeMap<String, ShareEntry>,
}

fn default_source() -> PathBuf {
    PathBuf::from(".")
}

impl ConfigFile {
    /// Validate into the immutable pipeline options.
    pub fn validate(self, file: &Path) -> GantryResult<Options> {
        let host = self
            .host
            .filter(|h| !h.is_empty())
            .ok_or_else(|| GantryError::Config {
                file: file.to_path_buf(),
                message: "missing required key 'host'".to_string(),
            })?;

        let deploy_path = self
            .deploy_path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GantryError::Config {
                file: file.to_path_buf(),
                message: "missing required key 'deploy_path'".to_string(),
            })?;

        // Unsupported kinds must fail here, before anything touches the
        // remote host.
        let archive_type = ArchiveKind::parse(&self.transfer.archive_type)?;

        let share = self
            .share
            .iter()
            .map(|(key, entry)| (key.clone(), entry.resolve(key)))
            .collect();

        Ok(Options {
            host,
            deploy_path,
            source: self.source,
            mode: self.transfer.mode,
            archive_type,
            archive_name: self.transfer.archive_name,
            exclude: self.transfer.exclude,
            delete_local_archive: self.transfer.delete_local_archive,
            synchronized_folder: self.transfer.synchronized_folder,
            releases_folder: self.release.releases_folder,
            shared_folder: self.release.shared_folder,
            current_release_link: self.release.current_release_link,
            releases_to_keep: self.release.releases_to_keep.max(1),
            create: self.release.create,
            make_writable: self.release.make_writable,
            make_executable: self.release.make_executable,
            share,
            debug: self.debug,
        })
    }
}

/// Validated pipeline options. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Options {
    pub host: String,
    pub deploy_path: String,
    pub source: PathBuf,
    pub mode: DeployMode,
    pub archive_type: ArchiveKind,
    pub archive_name: String,
    pub exclude: Vec<String>,
    pub delete_local_archive: bool,
    pub synchronized_folder: String,
    pub releases_folder: String,
    pub shared_folder: String,
    pub current_release_link: String,
    /// Clamped to >= 1 at validation
    pub releases_to_keep: usize,
    pub create: Vec<String>,
    pub make_writable: Vec<String>,
    pub make_executable: Vec<String>,
    /// folder-key -> resolved share target, in deterministic key order
    pub share: Vec<(String, ShareTarget)>,
    pub debug: bool,
}

impl Options {
    /// Remote path of the releases root
    pub fn releases_root(&self) -> String {
        format!(
            "{}/{}",
            self.deploy_path.trim_end_matches('/'),
            self.releases_folder
        )
    }

    /// Remote path of the current-release symlink
    pub fn current_link_path(&self) -> String {
        format!(
            "{}/{}",
            self.deploy_path.trim_end_matches('/'),
            self.current_release_link
        )
    }

    /// Remote path of the shared folder
    pub fn shared_root(&self) -> String {
        format!(
            "{}/{}",
            self.deploy_path.trim_end_matches('/'),
            self.shared_folder
        )
    }

    /// Remote path of the persistent synchronize-mode folder
    pub fn synchronized_root(&self) -> String {
        format!(
            "{}/{}",
            self.deploy_path.trim_end_matches('/'),
            self.synchronized_folder
        )
    }
}
