// src/tracker/fingerprint.rs

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::fs::FileSystem;
use crate::types::Strategy;

/// Recorded state of one file: a hex digest or a rendered timestamp.
///
/// Comparison is exact string equality for both strategies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Strategy {
    /// Compute the current fingerprint of `path` under this strategy.
    pub fn fingerprint(self, fs: &dyn FileSystem, path: &Path) -> Result<Fingerprint> {
        match self {
            Strategy::ContentHash => compute_file_hash(fs, path).map(Fingerprint),
            Strategy::Timestamp => {
                let secs = modification_secs(fs, path)?;
                Ok(Fingerprint(format_secs(secs)))
            }
        }
    }
}

/// Compute the BLAKE3 hash of a single file, as lowercase hex.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading file for hashing: {:?}", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Modification time of `path` in seconds since the Unix epoch.
///
/// Times before the epoch come back negative.
pub fn modification_secs(fs: &dyn FileSystem, path: &Path) -> Result<f64> {
    let modified = fs.modified(path)?;
    Ok(system_time_secs(modified))
}

fn system_time_secs(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}

// `Display` for f64 is the shortest string that parses back to the same value.
fn format_secs(secs: f64) -> String {
    format!("{secs}")
}
