// src/exec/sources.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::fs::{files_recursive, FileSystem};

/// Compiled `sources` / `exclude` patterns of one target.
///
/// Patterns are matched against paths relative to the project root, with `/`
/// as separator (e.g. `"src/gif.cpp"`).
#[derive(Clone)]
pub struct SourceSet {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSet")
            .field("has_include", &self.include.is_some())
            .field("has_exclude", &self.exclude.is_some())
            .finish()
    }
}

impl SourceSet {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_globset(include).context("building sources globset")?)
        };
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };
        Ok(Self { include, exclude })
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_none()
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        let Some(include) = &self.include else {
            return false;
        };
        if !include.is_match(rel_path) {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(rel_path),
            None => true,
        }
    }

    /// All files under `root` selected by this set, sorted.
    ///
    /// Returned paths are `root` joined with the relative path.
    pub fn collect(&self, fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for path in files_recursive(fs, root)? {
            if let Ok(rel) = path.strip_prefix(root) {
                let rel_str = rel.to_string_lossy().replace('\\', "/");
                if self.matches(&rel_str) {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
