#![allow(dead_code)]

pub use pybuild_test_utils::builders;
pub use pybuild_test_utils::init_tracing;
pub use pybuild_test_utils::recorder;

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Move a file's modification time `secs` seconds into the future.
pub fn bump_mtime(path: &Path, secs: u64) -> std::io::Result<()> {
    let current = fs::metadata(path)?.modified()?;
    let file = fs::File::options().write(true).open(path)?;
    file.set_modified(current + Duration::from_secs(secs))
}

pub fn set_mtime(path: &Path, time: SystemTime) -> std::io::Result<()> {
    let file = fs::File::options().write(true).open(path)?;
    file.set_modified(time)
}
