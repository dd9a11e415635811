// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PybuildError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// No target name was given and more than one target is registered.
    #[error("no target supplied and {count} targets are registered")]
    AmbiguousTarget { count: usize },

    #[error("no target named '{0}' was found")]
    UnknownTarget(String),

    #[error("no targets are registered")]
    NoTargets,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PybuildError {
    /// True for the errors `Registry::dispatch` reports when the invocation
    /// itself was wrong (as opposed to a failure while doing work).
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            PybuildError::AmbiguousTarget { .. }
                | PybuildError::UnknownTarget(_)
                | PybuildError::NoTargets
        )
    }
}

pub type Result<T> = std::result::Result<T, PybuildError>;
