//! Gantry - release-style deployment over SSH
//!
//! Gantry packages or synchronizes a local tree, transfers it to a single
//! remote host, unpacks and links it into a versioned release directory,
//! atomically flips the `current` symlink, then prunes old releases.

pub mod application;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod ui;

// Re-exports for convenience
pub use application::{CommandList, DeployReport, DeployUseCase, HookContext, HookSet, RemoveUseCase};
pub use config::{ArchiveKind, DeployMode, Options};
pub use domain::{Release, TagGenerator};
pub use error::{GantryError, GantryResult};
