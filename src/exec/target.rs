// src/exec/target.rs

//! Targets defined in a build file: a shell command guarded by optional change
//! detection over the target's sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::TargetConfig;
use crate::exec::command::{exit_code, run_shell};
use crate::exec::sources::SourceSet;
use crate::fs::{clear_dir, FileSystem};
use crate::targets::RunAction;
use crate::tracker::ChangeTracker;
use crate::types::{ChangeDetection, Strategy};

/// What happened when a command target ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Change detection found no modified sources; the command was not run.
    UpToDate,
    Built,
    /// The command exited unsuccessfully with this code.
    Failed(i32),
}

/// Directory under the project root that holds per-target ledgers. Nothing
/// below it is ever collected as a source.
pub const STATE_DIR: &str = ".pybuild";

/// Ledger used by target `name` when it does not set `ledger`, e.g.
/// `<root>/.pybuild/all.hashes.pybuild`.
///
/// Each target owns its ledger because every save replaces the whole file.
pub fn default_ledger_path(root: &Path, name: &str, strategy: Strategy) -> PathBuf {
    root.join(STATE_DIR).join(format!("{name}.{}", strategy.default_ledger()))
}

#[derive(Debug, Clone)]
struct Tracking {
    tracker: ChangeTracker,
    ledger: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CommandTarget {
    name: String,
    cmd: Option<String>,
    root: PathBuf,
    sources: SourceSet,
    create_dirs: Vec<PathBuf>,
    clear_dirs: Vec<PathBuf>,
    tracking: Option<Tracking>,
    /// Files never treated as sources, such as ledgers.
    ignored: Vec<PathBuf>,
    force: bool,
    fs: Arc<dyn FileSystem>,
}

impl CommandTarget {
    /// Build the target `name` from its build file section.
    ///
    /// `detection` is the already resolved change detection; relative paths
    /// resolve against `root`.
    pub fn from_config(
        name: &str,
        cfg: &TargetConfig,
        detection: ChangeDetection,
        root: &Path,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let sources = SourceSet::new(&cfg.sources, &cfg.exclude)
            .with_context(|| format!("compiling source patterns for target '{name}'"))?;

        let tracking = detection.strategy().map(|strategy| {
            let ledger = match cfg.ledger.as_deref() {
                Some(custom) => root.join(custom),
                None => default_ledger_path(root, name, strategy),
            };
            Tracking {
                tracker: ChangeTracker::new(strategy, Arc::clone(&fs)),
                ledger,
            }
        });
        let ignored = tracking.iter().map(|t| t.ledger.clone()).collect();

        Ok(Self {
            name: name.to_string(),
            cmd: cfg.cmd.clone(),
            root: root.to_path_buf(),
            sources,
            create_dirs: cfg.create_dirs.iter().map(|d| root.join(d)).collect(),
            clear_dirs: cfg.clear_dirs.iter().map(|d| root.join(d)).collect(),
            tracking,
            ignored,
            force: false,
            fs,
        })
    }

    /// Run the command even when no source changed.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Exclude these files from the sources in addition to the own ledger.
    pub fn with_ignored_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        for path in paths {
            if !self.ignored.contains(&path) {
                self.ignored.push(path);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ledger_path(&self) -> Option<&Path> {
        self.tracking.as_ref().map(|t| t.ledger.as_path())
    }

    /// Sources currently selected by the target's patterns, leaving out
    /// ledgers and everything under [`STATE_DIR`].
    pub fn source_files(&self) -> Result<Vec<PathBuf>> {
        let state_dir = self.root.join(STATE_DIR);
        Ok(self
            .sources
            .collect(self.fs.as_ref(), &self.root)?
            .into_iter()
            .filter(|path| !path.starts_with(&state_dir) && !self.ignored.contains(path))
            .collect())
    }

    /// Run the target once and report the outcome.
    ///
    /// The ledger is only rewritten after the command succeeds.
    pub fn execute(&self) -> Result<BuildOutcome> {
        let files = self.source_files()?;

        if let Some(tracking) = &self.tracking {
            if !self.force && !files.is_empty() {
                let changes = tracking.tracker.changes(&files, &tracking.ledger)?;
                if changes.is_empty() {
                    info!(target_name = %self.name, sources = files.len(), "up to date");
                    return Ok(BuildOutcome::UpToDate);
                }
                info!(
                    target_name = %self.name,
                    changed = changes.changed.len(),
                    removed = changes.removed.len(),
                    sources = files.len(),
                    "sources changed; rebuilding"
                );
            }
        }

        for dir in &self.clear_dirs {
            if self.fs.is_dir(dir) {
                let removed = clear_dir(self.fs.as_ref(), dir)?;
                info!(dir = %dir.display(), removed, "cleared directory");
            }
        }

        for dir in &self.create_dirs {
            if !self.fs.is_dir(dir) {
                info!(dir = %dir.display(), "creating directory");
                self.fs.create_dir_all(dir)?;
            }
        }

        if let Some(cmd) = &self.cmd {
            let status = run_shell(cmd, &self.root)?;
            if !status.success() {
                let code = exit_code(&status);
                error!(target_name = %self.name, exit_code = code, "command failed");
                return Ok(BuildOutcome::Failed(code));
            }
        }

        if let Some(tracking) = &self.tracking {
            if !files.is_empty() {
                tracking.tracker.save_at(&files, &tracking.ledger)?;
            }
        }

        info!(target_name = %self.name, "built");
        Ok(BuildOutcome::Built)
    }
}

impl RunAction for CommandTarget {
    /// Terminates the process when the command fails or cannot be run.
    fn invoke(&self) {
        match self.execute() {
            Ok(BuildOutcome::UpToDate | BuildOutcome::Built) => {}
            Ok(BuildOutcome::Failed(code)) => std::process::exit(code),
            Err(err) => {
                error!(target_name = %self.name, error = %format!("{err:#}"), "target error");
                std::process::exit(1);
            }
        }
    }
}
