// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    /// Replace the contents of `path`, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Last modification time as reported by the filesystem.
    fn modified(&self, path: &Path) -> Result<SystemTime>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        Ok(Box::new(file))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        let mut file = fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        file.write_all(contents).with_context(|| format!("writing to file {:?}", path))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .with_context(|| format!("reading modification time of {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("creating dir {:?}", path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}

/// Regular files directly inside `dir` (no recursion), sorted.
pub fn list_files(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs
        .read_dir(dir)?
        .into_iter()
        .filter(|p| fs.is_file(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Regular files directly inside `dir` whose extension is `ext`.
///
/// `ext` includes the leading dot, e.g. `".cpp"`.
pub fn list_files_with_ext(fs: &dyn FileSystem, dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let wanted = ext.strip_prefix('.').unwrap_or(ext);
    Ok(list_files(fs, dir)?
        .into_iter()
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(wanted))
        .collect())
}

/// Every file under `dir`, descending into subdirectories, sorted.
pub fn files_recursive(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs.read_dir(&current)? {
            if fs.is_dir(&entry) {
                pending.push(entry);
            } else if fs.is_file(&entry) {
                out.push(entry);
            }
        }
    }

    out.sort();
    Ok(out)
}

/// Delete the regular files directly inside `dir`, keeping the directory and
/// any subdirectories. Returns how many files were removed.
pub fn clear_dir(fs: &dyn FileSystem, dir: &Path) -> Result<usize> {
    let files = list_files(fs, dir)?;
    for file in &files {
        fs.remove_file(file)?;
    }
    Ok(files.len())
}
