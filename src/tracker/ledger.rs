// src/tracker/ledger.rs

//! On-disk ledger of file fingerprints.
//!
//! A ledger is a small TOML document:
//!
//! ```toml
//! version = 1
//! strategy = "hash"
//!
//! [[record]]
//! path = "src/main.cpp"
//! fingerprint = "9f86d081884c7d65..."
//! ```
//!
//! Paths are stored as TOML strings, so any character (including `:` and
//! newlines) survives a round trip.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fs::FileSystem;
use crate::tracker::fingerprint::Fingerprint;
use crate::types::Strategy;

pub const LEDGER_FORMAT_VERSION: u32 = 1;

/// One `(path, fingerprint)` pair. The path is kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub path: String,
    pub fingerprint: Fingerprint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub version: u32,
    pub strategy: Strategy,
    #[serde(default, rename = "record")]
    pub records: Vec<Record>,
}

/// Result of reading a ledger from disk.
#[derive(Debug)]
pub enum LedgerRead {
    Missing,
    /// The file exists but is not a ledger this version understands.
    Malformed(String),
    Loaded(Ledger),
}

impl Ledger {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            version: LEDGER_FORMAT_VERSION,
            strategy,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, path: impl Into<String>, fingerprint: Fingerprint) {
        self.records.push(Record {
            path: path.into(),
            fingerprint,
        });
    }

    /// First record whose path equals `path` exactly.
    pub fn lookup(&self, path: &str) -> Option<&Fingerprint> {
        self.records
            .iter()
            .find(|r| r.path == path)
            .map(|r| &r.fingerprint)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("serializing ledger")
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let ledger: Ledger = toml::from_str(contents).map_err(|e| e.to_string())?;
        if ledger.version != LEDGER_FORMAT_VERSION {
            return Err(format!(
                "unsupported ledger version {} (expected {})",
                ledger.version, LEDGER_FORMAT_VERSION
            ));
        }
        Ok(ledger)
    }

    /// Replace whatever is at `path` with this ledger.
    pub fn store(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;
        fs.write(path, contents.as_bytes())
            .with_context(|| format!("writing ledger {:?}", path))
    }

    /// Read the ledger at `path`.
    ///
    /// Only a failure to read an existing file is an error; a missing or
    /// unparseable ledger is reported through [`LedgerRead`].
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<LedgerRead> {
        if !fs.exists(path) {
            return Ok(LedgerRead::Missing);
        }
        let mut bytes = Vec::new();
        fs.open_read(path)
            .and_then(|mut file| file.read_to_end(&mut bytes).map_err(Into::into))
            .with_context(|| format!("reading ledger {:?}", path))?;
        let Ok(contents) = String::from_utf8(bytes) else {
            return Ok(LedgerRead::Malformed("ledger is not valid UTF-8".to_string()));
        };
        Ok(match Ledger::parse(&contents) {
            Ok(ledger) => LedgerRead::Loaded(ledger),
            Err(reason) => LedgerRead::Malformed(reason),
        })
    }
}

/// String key a path is recorded under.
pub fn record_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
