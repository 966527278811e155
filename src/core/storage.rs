// src/core/storage.rs
//! Durable string key/value storage behind the session store

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::types::Portal;

/// Minimal key/value contract, the same surface as browser local storage.
pub trait SessionStorage: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One JSON object per portal on disk, rewritten atomically on every change.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<dir>/<portal>.json`
    pub fn for_portal(dir: &Path, portal: Portal) -> Self {
        Self::new(dir.join(format!("{}.json", portal.storage_name())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // A corrupt file reads as empty; the next write replaces it.
                app_log!(
                    warn,
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize session entries")?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp_file = File::create(&tmp_path)
            .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
        tmp_file
            .write_all(content.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace session file: {}", self.path.display()))?;

        app_log!(debug, "Written session file: {}", self.path.display());
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&entries)
    }
}

/// In-process storage, used by tests and by callers that want no persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::for_portal(dir.path(), Portal::Talent);
        storage.set("authToken", "abc").unwrap();

        let reopened = FileStorage::for_portal(dir.path(), Portal::Talent);
        assert_eq!(reopened.get("authToken").unwrap().as_deref(), Some("abc"));
        assert!(reopened.path().ends_with("talent.json"));
    }

    #[test]
    fn file_storage_remove_is_safe_when_missing() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::for_portal(dir.path(), Portal::Employer);
        storage.remove("token").unwrap();
        assert!(!storage.path().exists());

        storage.set("token", "t").unwrap();
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("employer.json");
        fs::write(&path, "{not json").unwrap();

        let mut storage = FileStorage::new(path);
        assert_eq!(storage.get("token").unwrap(), None);
        storage.set("token", "fresh").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("fresh"));
    }
}
