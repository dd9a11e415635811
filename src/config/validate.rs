// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PybuildError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PybuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.defaults, raw.target))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_targets(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(PybuildError::ConfigError(
            "build file must contain at least one [target.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_targets(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        if name.trim().is_empty() {
            return Err(PybuildError::ConfigError(
                "target names must not be empty".to_string(),
            ));
        }

        match &target.cmd {
            Some(cmd) if cmd.trim().is_empty() => {
                return Err(PybuildError::ConfigError(format!(
                    "target '{}' has an empty `cmd`",
                    name
                )));
            }
            None if target.clear_dirs.is_empty() => {
                return Err(PybuildError::ConfigError(format!(
                    "target '{}' has neither `cmd` nor `clear_dirs`",
                    name
                )));
            }
            _ => {}
        }

        for pattern in target.sources.iter().chain(target.exclude.iter()) {
            Glob::new(pattern).map_err(|e| {
                PybuildError::ConfigError(format!(
                    "target '{}' has an invalid glob '{}': {}",
                    name, pattern, e
                ))
            })?;
        }

        let detection = target.effective_change_detection(cfg.defaults.change_detection);
        if target.ledger.is_some() && detection.strategy().is_none() {
            return Err(PybuildError::ConfigError(format!(
                "target '{}' sets `ledger` but change detection is off",
                name
            )));
        }
    }
    Ok(())
}
