use crate::storage::KeyValueStore;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key-value store persisted as a single JSON object on disk.
///
/// The whole map is loaded on open and rewritten (temp file + rename) on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create store directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.entries).context("serialize store failed")?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, json)
            .with_context(|| format!("failed to write {}", temp_path.display()))?;
        if let Err(err) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err).with_context(|| format!("failed to replace {}", self.path.display()));
        }

        tracing::debug!(path = %self.path.display(), keys = self.entries.len(), "store flushed");
        Ok(())
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "store unreadable; starting empty");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str::<BTreeMap<String, String>>(&text) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "store is corrupt; starting empty");
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
