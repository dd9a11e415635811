// src/exec/mod.rs

//! Build actions backed by shell commands.
//!
//! This is the only place that knows about processes and platform shells;
//! the registry and change tracker stay platform-agnostic.

pub mod command;
pub mod sources;
pub mod target;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::config::ConfigFile;
use crate::fs::FileSystem;
use crate::targets::Registry;
use crate::types::ChangeDetection;

pub use command::{run_shell, shell_command};
pub use sources::SourceSet;
pub use target::{default_ledger_path, BuildOutcome, CommandTarget, STATE_DIR};

/// Options applied to every target built from a build file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Ignore change detection and always run commands.
    pub force: bool,
    /// Replaces the change detection every target would otherwise use.
    pub change_detection: Option<ChangeDetection>,
}

/// One [`CommandTarget`] per `[target.<name>]` section.
///
/// Every target skips all ledgers of the build file when collecting sources.
pub fn command_targets(
    cfg: &ConfigFile,
    root: &Path,
    fs: Arc<dyn FileSystem>,
    options: BuildOptions,
) -> Result<Vec<CommandTarget>> {
    let targets = cfg
        .target
        .iter()
        .map(|(name, target)| {
            let detection = options.change_detection.unwrap_or_else(|| {
                target.effective_change_detection(cfg.defaults.change_detection)
            });
            CommandTarget::from_config(name, target, detection, root, Arc::clone(&fs))
                .map(|t| t.with_force(options.force))
        })
        .collect::<Result<Vec<_>>>()?;

    let ledgers: Vec<PathBuf> = targets
        .iter()
        .filter_map(|t| t.ledger_path().map(Path::to_path_buf))
        .collect();

    Ok(targets
        .into_iter()
        .map(|t| t.with_ignored_paths(ledgers.iter().cloned()))
        .collect())
}

/// Register every target of the build file on a fresh [`Registry`].
pub fn registry_from_config(
    cfg: &ConfigFile,
    root: &Path,
    fs: Arc<dyn FileSystem>,
    options: BuildOptions,
) -> Result<Registry> {
    let mut registry = Registry::new();
    for target in command_targets(cfg, root, fs, options)? {
        registry.register(target.name().to_string(), target);
    }
    Ok(registry)
}
