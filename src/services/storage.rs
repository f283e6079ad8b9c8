//! Durable key-value storage.
//!
//! The editor persists exactly one key, but the store is kept behind a trait
//! so tests can run against an in-memory map and the on-disk layout stays an
//! implementation detail.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A durable string-to-string store.
pub trait KeyValueStore {
    /// Read a key. `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one file per key under a root directory.
///
/// Writes go through a temp file and a rename so a crash mid-write never
/// leaves a truncated value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create store directory {}", root.display()))?;
        Ok(Self { root })
    }

    /// The default store root: the user data directory, or the system temp
    /// directory when no data directory is available.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("jot")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read stored key {key:?}")),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let tmp = self.root.join(format!(".{key}.tmp"));
        fs::write(&tmp, value)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
