#![allow(dead_code)]

use std::collections::BTreeMap;
use pybuild::config::{ConfigFile, DefaultsSection, RawConfigFile, TargetConfig};
use pybuild::types::ChangeDetection;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                defaults: DefaultsSection::default(),
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.config.target.insert(name.to_string(), target);
        self
    }

    pub fn with_default_change_detection(mut self, val: ChangeDetection) -> Self {
        self.config.defaults.change_detection = val;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            target: TargetConfig::new(cmd),
        }
    }

    /// A target with no command, e.g. one that only clears directories.
    pub fn without_cmd() -> Self {
        Self {
            target: TargetConfig::default(),
        }
    }

    pub fn source(mut self, pattern: &str) -> Self {
        self.target.sources.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.target.exclude.push(pattern.to_string());
        self
    }

    pub fn create_dir(mut self, dir: &str) -> Self {
        self.target.create_dirs.push(dir.to_string());
        self
    }

    pub fn clear_dir(mut self, dir: &str) -> Self {
        self.target.clear_dirs.push(dir.to_string());
        self
    }

    pub fn change_detection(mut self, val: ChangeDetection) -> Self {
        self.target.change_detection = Some(val);
        self
    }

    pub fn ledger(mut self, path: &str) -> Self {
        self.target.ledger = Some(path.to_string());
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}
