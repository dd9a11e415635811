// src/tracker/mod.rs

//! File change detection across runs.
//!
//! A [`ChangeTracker`] fingerprints files with one [`Strategy`] and keeps the
//! fingerprints in a ledger file. Later runs ask whether a file still matches
//! its recorded fingerprint.
//!
//! Every case where the ledger cannot vouch for a file (no ledger yet, no
//! record for the path, unreadable contents, a ledger written by the other
//! strategy) answers "changed".

pub mod fingerprint;
pub mod ledger;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::types::Strategy;

pub use fingerprint::{compute_file_hash, modification_secs, Fingerprint};
pub use ledger::{Ledger, LedgerRead, Record, LEDGER_FORMAT_VERSION};

use ledger::record_key;

/// Outcome of [`ChangeTracker::changes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files that are new or differ from their recorded fingerprint.
    pub changed: Vec<PathBuf>,
    /// Ledger paths with no counterpart in the queried files.
    pub removed: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ChangeTracker {
    strategy: Strategy,
    fs: Arc<dyn FileSystem>,
}

impl ChangeTracker {
    pub fn new(strategy: Strategy, fs: Arc<dyn FileSystem>) -> Self {
        Self { strategy, fs }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn default_ledger(&self) -> PathBuf {
        PathBuf::from(self.strategy.default_ledger())
    }

    pub fn fingerprint(&self, file: &Path) -> Result<Fingerprint> {
        self.strategy.fingerprint(self.fs.as_ref(), file)
    }

    /// [`save_at`](Self::save_at) using the strategy's default ledger.
    pub fn save<P: AsRef<Path>>(&self, files: &[P]) -> Result<()> {
        self.save_at(files, &self.default_ledger())
    }

    /// Fingerprint `files` and replace the ledger at `ledger_path` with them.
    ///
    /// Order is kept and duplicates are recorded again. All fingerprints are
    /// computed before the ledger is touched.
    pub fn save_at<P: AsRef<Path>>(&self, files: &[P], ledger_path: &Path) -> Result<()> {
        let mut ledger = Ledger::new(self.strategy);
        for file in files {
            let file = file.as_ref();
            let fp = self.fingerprint(file)?;
            debug!(file = %file.display(), fingerprint = %fp, "fingerprinted");
            ledger.push(record_key(file), fp);
        }
        ledger.store(self.fs.as_ref(), ledger_path)?;
        info!(
            ledger = %ledger_path.display(),
            strategy = %self.strategy,
            records = ledger.records.len(),
            "saved file ledger"
        );
        Ok(())
    }

    /// [`has_changed_at`](Self::has_changed_at) using the default ledger.
    pub fn has_changed(&self, file: impl AsRef<Path>) -> Result<bool> {
        self.has_changed_at(file, &self.default_ledger())
    }

    /// Whether `file` differs from its fingerprint in the ledger at
    /// `ledger_path`.
    pub fn has_changed_at(&self, file: impl AsRef<Path>, ledger_path: &Path) -> Result<bool> {
        let file = file.as_ref();
        match self.load_usable(ledger_path)? {
            Some(ledger) => self.compare(&ledger, file),
            None => Ok(true),
        }
    }

    /// The subset of `files` that [`has_changed_at`](Self::has_changed_at)
    /// would report, reading the ledger once.
    pub fn changed_files<P: AsRef<Path>>(
        &self,
        files: &[P],
        ledger_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        Ok(self.changes(files, ledger_path)?.changed)
    }

    /// Compare the set `files` against the ledger as a whole.
    ///
    /// Besides the changed files this also reports ledger records whose path
    /// is no longer in `files`, so a shrinking set counts as a change.
    pub fn changes<P: AsRef<Path>>(&self, files: &[P], ledger_path: &Path) -> Result<ChangeSet> {
        let Some(ledger) = self.load_usable(ledger_path)? else {
            return Ok(ChangeSet {
                changed: files.iter().map(|f| f.as_ref().to_path_buf()).collect(),
                removed: Vec::new(),
            });
        };

        let mut changed = Vec::new();
        let mut current = HashSet::with_capacity(files.len());
        for file in files {
            let file = file.as_ref();
            current.insert(record_key(file));
            if self.compare(&ledger, file)? {
                changed.push(file.to_path_buf());
            }
        }

        let mut removed: Vec<String> = Vec::new();
        for record in &ledger.records {
            if !current.contains(&record.path) && !removed.contains(&record.path) {
                removed.push(record.path.clone());
            }
        }
        if !removed.is_empty() {
            debug!(
                ledger = %ledger_path.display(),
                removed = removed.len(),
                "ledger lists files that are gone"
            );
        }

        Ok(ChangeSet { changed, removed })
    }

    /// Load the ledger if it can answer queries for this strategy.
    fn load_usable(&self, ledger_path: &Path) -> Result<Option<Ledger>> {
        match Ledger::load(self.fs.as_ref(), ledger_path)? {
            LedgerRead::Missing => {
                info!(
                    ledger = %ledger_path.display(),
                    "ledger does not exist; assuming this is a first run"
                );
                Ok(None)
            }
            LedgerRead::Malformed(reason) => {
                warn!(
                    ledger = %ledger_path.display(),
                    %reason,
                    "ignoring unreadable ledger; treating files as changed"
                );
                Ok(None)
            }
            LedgerRead::Loaded(ledger) if ledger.strategy != self.strategy => {
                warn!(
                    ledger = %ledger_path.display(),
                    found = %ledger.strategy,
                    expected = %self.strategy,
                    "ledger was written by another strategy; treating files as changed"
                );
                Ok(None)
            }
            LedgerRead::Loaded(ledger) => Ok(Some(ledger)),
        }
    }

    fn compare(&self, ledger: &Ledger, file: &Path) -> Result<bool> {
        let key = record_key(file);
        let Some(recorded) = ledger.lookup(&key) else {
            info!(file = %key, "no ledger record for file; treating as changed");
            return Ok(true);
        };
        let current = self.fingerprint(file)?;
        let changed = current != *recorded;
        debug!(file = %key, %recorded, %current, changed, "compared fingerprint");
        Ok(changed)
    }
}
