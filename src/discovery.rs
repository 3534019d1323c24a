//! Level discovery in a working directory.
//!
//! A level named `foo` may exist as `foo.layout` (game binary), as
//! `foo.layout.json` (editable twin produced by the converter), or both.
//! `foo.layout.backup` is written by the converter and never listed.

#[cfg(test)]
#[path = "discovery_test.rs"]
mod discovery_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

pub const JSON_EXTENSION: &str = ".layout.json";
pub const LAYOUT_EXTENSION: &str = ".layout";
pub const BACKUP_EXTENSION: &str = ".layout.backup";

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to list {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },
    #[error("failed to stat {}: {source}", path.display())]
    Metadata { path: PathBuf, source: io::Error },
}

/// Level name for a file name, if it is a layout or layout JSON file.
#[must_use]
pub fn level_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(JSON_EXTENSION)
        .or_else(|| file_name.strip_suffix(LAYOUT_EXTENSION))
        .filter(|name| !name.is_empty())
}

/// Names of all levels in `dir`, de-duplicated, in file-name order.
///
/// # Errors
///
/// [`DiscoveryError::ReadDir`] if the directory cannot be listed.
pub fn discover_levels(dir: &Path) -> Result<Vec<String>, DiscoveryError> {
    let read_err = |source| DiscoveryError::ReadDir { path: dir.to_path_buf(), source };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.push(name.to_owned());
        }
    }
    files.sort();

    let mut levels: Vec<String> = Vec::new();
    for file in &files {
        if let Some(name) = level_name(file) {
            if !levels.iter().any(|l| l == name) {
                levels.push(name.to_owned());
            }
        }
    }
    debug!(dir = %dir.display(), count = levels.len(), "levels discovered");
    Ok(levels)
}

/// One level's files in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    dir: PathBuf,
    name: String,
}

impl Level {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { dir: dir.into(), name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn layout_path(&self) -> PathBuf {
        self.dir.join(format!("{}{LAYOUT_EXTENSION}", self.name))
    }

    #[must_use]
    pub fn json_path(&self) -> PathBuf {
        self.dir.join(format!("{}{JSON_EXTENSION}", self.name))
    }

    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        self.dir.join(format!("{}{BACKUP_EXTENSION}", self.name))
    }

    /// Whether the binary layout must be converted before editing: it exists
    /// and the JSON twin is missing or older.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Metadata`] if a file exists but cannot be stat'ed.
    pub fn needs_import(&self) -> Result<bool, DiscoveryError> {
        let layout = self.layout_path();
        let json = self.json_path();
        if !layout.is_file() {
            return Ok(false);
        }
        if !json.is_file() {
            return Ok(true);
        }
        Ok(modified(&layout)? > modified(&json)?)
    }
}

fn modified(path: &Path) -> Result<std::time::SystemTime, DiscoveryError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| DiscoveryError::Metadata { path: path.to_path_buf(), source })
}
