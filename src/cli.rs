// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::types::ChangeDetection;

/// Command-line arguments for `pybuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pybuild",
    version,
    about = "Run named build targets, skipping work whose sources have not changed.",
    long_about = None
)]
pub struct CliArgs {
    /// Target to run. May be omitted when the build file defines exactly one.
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Path to the build file (TOML).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PYBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the available targets and exit.
    #[arg(long)]
    pub list: bool,

    /// Parse + validate, print targets, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,

    /// Run the target even if its sources are unchanged.
    #[arg(long)]
    pub force: bool,

    /// Override every target's change detection (hash, mtime, off).
    #[arg(long, value_name = "MODE")]
    pub change_detection: Option<ChangeDetection>,
}

impl CliArgs {
    /// Tokens handed to `Registry::dispatch`: program name, then the target
    /// if one was given.
    pub fn dispatch_args(&self) -> Vec<String> {
        let mut args = vec!["pybuild".to_string()];
        if let Some(target) = &self.target {
            args.push(target.clone());
        }
        args
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
