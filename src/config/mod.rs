//! Configuration: `gantry.toml` parsing, env overrides, validation

mod loader;
mod types;


pub use loader::{load_options, load_with_warnings, with_env_overrides, ConfigWarning};
pub use types::{
    ArchiveKind, ConfigFile, DeployMode, Options, ReleaseConfig, ShareEntry, ShareTarget,
    TransferConfig,
};
