use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a file's state is fingerprinted.
///
/// - `ContentHash`: BLAKE3 digest of the file bytes (`"hash"`).
/// - `Timestamp`: last modification time in seconds since the epoch (`"mtime"`).
///
/// The two strategies write separate ledgers and never read each other's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "hash")]
    ContentHash,
    #[serde(rename = "mtime")]
    Timestamp,
}

impl Strategy {
    /// Ledger filename used when the caller does not pick one.
    pub fn default_ledger(self) -> &'static str {
        match self {
            Strategy::ContentHash => "hashes.pybuild",
            Strategy::Timestamp => "timestamps.pybuild",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::ContentHash => "hash",
            Strategy::Timestamp => "mtime",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `change_detection` setting of a build file target or the
/// `--change-detection` CLI override.
///
/// TOML and the CLI accept the same spellings: `hash`, `mtime` (or
/// `timestamp`) and `off` (or `none`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDetection {
    Hash,
    #[serde(alias = "timestamp")]
    Mtime,
    #[default]
    #[serde(alias = "none")]
    Off,
}

impl ChangeDetection {
    /// The tracker strategy for this setting, or `None` when detection is off.
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            ChangeDetection::Hash => Some(Strategy::ContentHash),
            ChangeDetection::Mtime => Some(Strategy::Timestamp),
            ChangeDetection::Off => None,
        }
    }
}

impl FromStr for ChangeDetection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash" => Ok(ChangeDetection::Hash),
            "mtime" | "timestamp" => Ok(ChangeDetection::Mtime),
            "off" | "none" => Ok(ChangeDetection::Off),
            other => Err(format!(
                "invalid change detection '{other}' (expected \"hash\", \"mtime\" or \"off\")"
            )),
        }
    }
}
