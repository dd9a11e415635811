// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::ChangeDetection;

/// Top-level build file as read from TOML, before validation.
///
/// ```toml
/// [defaults]
/// change_detection = "hash"
///
/// [target.all]
/// cmd = "g++ src/*.cpp -o bin/reader"
/// sources = ["src/**/*.cpp"]
/// create_dirs = ["bin"]
///
/// [target.clean]
/// clear_dirs = ["bin"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub defaults: DefaultsSection,

    /// All targets from `[target.<name>]`, keyed by target name.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// A build file that passed validation. Build one with
/// `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub defaults: DefaultsSection,
    pub target: BTreeMap<String, TargetConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        defaults: DefaultsSection,
        target: BTreeMap<String, TargetConfig>,
    ) -> Self {
        Self { defaults, target }
    }

    /// Resolved change detection for the named target.
    pub fn change_detection_for(&self, name: &str) -> Option<ChangeDetection> {
        self.target
            .get(name)
            .map(|t| t.effective_change_detection(self.defaults.change_detection))
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    /// Applied to targets that do not set `change_detection`. Off when unset.
    #[serde(default)]
    pub change_detection: ChangeDetection,
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Shell command to run. A target may leave it out if it only clears
    /// directories.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Glob patterns (relative to the build file's directory) selecting the
    /// files whose changes trigger a rebuild.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Glob patterns removed from `sources`.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Directories created before the command runs.
    #[serde(default)]
    pub create_dirs: Vec<String>,

    /// Directories whose files are deleted before the command runs. The
    /// directories themselves and their subdirectories stay.
    #[serde(default)]
    pub clear_dirs: Vec<String>,

    /// Per-target override of `[defaults].change_detection`.
    #[serde(default)]
    pub change_detection: Option<ChangeDetection>,

    /// Ledger path override. Defaults to `.pybuild/<name>.<strategy ledger>`.
    #[serde(default)]
    pub ledger: Option<String>,
}

impl TargetConfig {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: Some(cmd.into()),
            ..Self::default()
        }
    }

    pub fn effective_change_detection(&self, default: ChangeDetection) -> ChangeDetection {
        self.change_detection.unwrap_or(default)
    }
}
