// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Fake clock start: every write advances modification time by one second.
const CLOCK_START_SECS: u64 = 1_700_000_000;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    tick: u64,
}

impl MockState {
    fn next_time(&mut self) -> SystemTime {
        self.tick += 1;
        UNIX_EPOCH + Duration::from_secs(CLOCK_START_SECS + self.tick)
    }
}

/// In-memory filesystem for tests.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create or replace a file, stamping it with the next fake clock tick.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        let modified = state.next_time();
        state.entries.insert(
            path.clone(),
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
        link_into_parent(&mut state.entries, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        ensure_dir_entry(&mut state.entries, path.as_ref());
    }

    /// Overwrite the modification time of an existing file.
    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) -> Result<()> {
        let path = path.as_ref();
        let mut state = self.lock();
        match state.entries.get_mut(path) {
            Some(MockEntry::File { modified, .. }) => {
                *modified = time;
                Ok(())
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

fn parent_or_root(path: &Path) -> Option<&Path> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        }
    })
}

fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_or_root(path) else {
        return;
    };
    if parent == path {
        return;
    }
    ensure_dir_entry(entries, parent);
    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_into_parent(entries, path);
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { content, .. }) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { content, .. }) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if self.is_dir(path) {
            return Err(anyhow!("Is a directory: {:?}", path));
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.is_file(path) {
            return Err(anyhow!("Is a file: {:?}", path));
        }
        self.add_dir(path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { .. }) => {}
            Some(MockEntry::Dir(_)) => return Err(anyhow!("Is a directory: {:?}", path)),
            None => return Err(anyhow!("File not found: {:?}", path)),
        }
        state.entries.remove(path);
        let name = path.file_name().and_then(|n| n.to_str());
        if let (Some(parent), Some(name)) = (parent_or_root(path), name) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                children.retain(|c| c != name);
            }
        }
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
