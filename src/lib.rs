// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod targets;
pub mod tracker;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{load_and_validate, project_root, ConfigFile};
use crate::errors::Result;
use crate::exec::{registry_from_config, BuildOptions};
use crate::fs::RealFileSystem;
use crate::targets::Dispatched;
use crate::types::ChangeDetection;

pub use crate::errors::PybuildError;
pub use crate::targets::{Registry, RunAction};
pub use crate::tracker::ChangeTracker;
pub use crate::types::Strategy;

/// What [`run`] ended up doing.
#[derive(Debug)]
pub enum RunOutcome {
    Listed,
    DryRun,
    Dispatched(Dispatched),
}

/// High-level entry point used by `main.rs`.
///
/// Loads the build file, registers one target per `[target.<name>]` and
/// dispatches on the CLI target. Dispatch usage errors come back as the
/// matching [`PybuildError`] variant.
pub fn run(args: &CliArgs) -> Result<RunOutcome> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let root = project_root(&config_path);

    if args.list {
        for name in cfg.target.keys() {
            println!("{name}");
        }
        return Ok(RunOutcome::Listed);
    }

    if args.dry_run {
        print_dry_run(&cfg, args.change_detection);
        return Ok(RunOutcome::DryRun);
    }

    let options = BuildOptions {
        force: args.force,
        change_detection: args.change_detection,
    };
    let registry = registry_from_config(&cfg, &root, Arc::new(RealFileSystem), options)?;
    debug!(?registry, root = %root.display(), "registered targets");

    let dispatched = registry.dispatch(args.dispatch_args().as_slice())?;
    Ok(RunOutcome::Dispatched(dispatched))
}

/// Simple dry-run output: print targets and their commands.
fn print_dry_run(cfg: &ConfigFile, detection_override: Option<ChangeDetection>) {
    println!("pybuild dry-run");
    println!(
        "  defaults.change_detection = {:?}",
        cfg.defaults.change_detection
    );
    println!();

    println!("targets ({}):", cfg.target.len());
    for (name, target) in cfg.target.iter() {
        println!("  - {name}");
        if let Some(ref cmd) = target.cmd {
            println!("      cmd: {cmd}");
        }
        if !target.sources.is_empty() {
            println!("      sources: {:?}", target.sources);
        }
        if !target.exclude.is_empty() {
            println!("      exclude: {:?}", target.exclude);
        }
        if !target.create_dirs.is_empty() {
            println!("      create_dirs: {:?}", target.create_dirs);
        }
        if !target.clear_dirs.is_empty() {
            println!("      clear_dirs: {:?}", target.clear_dirs);
        }
        println!(
            "      change_detection: {:?}",
            detection_override
                .unwrap_or_else(|| target.effective_change_detection(cfg.defaults.change_detection))
        );
        if let Some(ref ledger) = target.ledger {
            println!("      ledger: {ledger}");
        }
    }

    debug!("dry-run complete (no execution)");
}
