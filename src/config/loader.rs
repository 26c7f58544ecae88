//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GantryError, GantryResult};

use super::types::{ConfigFile, Options};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

/// Load a config file and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> GantryResult<(ConfigFile, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| GantryError::Config {
        file: path.to_path_buf(),
        message: format!("cannot read: {}", e),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: ConfigFile = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| GantryError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| ConfigWarning {
            key,
            file: path.to_path_buf(),
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (GANTRY_* prefix)
pub fn with_env_overrides(mut config: ConfigFile) -> ConfigFile {
    if let Ok(host) = std::env::var("GANTRY_HOST") {
        if !host.is_empty() {
            config.host = Some(host);
        }
    }

    if let Ok(path) = std::env::var("GANTRY_DEPLOY_PATH") {
        if !path.is_empty() {
            config.deploy_path = Some(path);
        }
    }

    config
}

/// Load, apply env overrides, and validate in one step.
pub fn load_options(path: &Path) -> GantryResult<(Options, Vec<ConfigWarning>)> {
    let (config, warnings) = load_with_warnings(path)?;
    let options = with_env_overrides(config).validate(path)?;
    Ok((options, warnings))
}
