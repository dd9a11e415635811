// src/config/mod.rs

//! Build file loading and validation for pybuild.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a build file from disk (`loader.rs`).
//! - Validate targets and patterns (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str, project_root, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, DefaultsSection, RawConfigFile, TargetConfig};
