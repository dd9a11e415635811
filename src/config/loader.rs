// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Build file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Pybuild.toml";

/// Load a build file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a build file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Directory the build file lives in; commands, globs and ledgers are
/// relative to it.
///
/// A bare filename like `Pybuild.toml` (empty parent) maps to the current
/// working directory.
pub fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
