// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persistent language preference
//!
//! The portal persists exactly one value: the last explicitly chosen
//! language code, under [`LANG_KEY`].

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Key the language code is stored under.
pub const LANG_KEY: &str = "bh_rules_lang";

/// A single persisted string value.
pub trait PreferenceStore {
    /// Stored value, if any. Unreadable storage reads as "nothing stored".
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: &str) -> Result<()>;
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Box<P> {
    fn read(&self) -> Option<String> {
        (**self).read()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        (**self).write(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    value: Option<String>,
    writes: usize,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            writes: 0,
        }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryPreferences {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferenceRecord {
    key: String,
    value: String,
    updated_at: String,
}

/// Preference kept as a small JSON file.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn read(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let record: PreferenceRecord = serde_json::from_str(&raw).ok()?;
        (record.key == LANG_KEY).then_some(record.value)
    }

    fn write(&mut self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating preference directory {}", parent.display()))?;
        }
        let record = PreferenceRecord {
            key: LANG_KEY.to_string(),
            value: value.to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };
        let payload = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, payload)
            .with_context(|| format!("writing preference file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_preferences_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut prefs = FilePreferences::new(dir.path().join("nested/prefs.json"));
        assert_eq!(prefs.read(), None);
        prefs.write("ar").unwrap();
        assert_eq!(prefs.read().as_deref(), Some("ar"));
        prefs.write("en").unwrap();
        assert_eq!(prefs.read().as_deref(), Some("en"));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(FilePreferences::new(&path).read(), None);
    }

    #[test]
    fn memory_preferences_count_writes() {
        let mut prefs = MemoryPreferences::with_value("ar");
        assert_eq!(prefs.read().as_deref(), Some("ar"));
        prefs.write("en").unwrap();
        assert_eq!(prefs.writes(), 1);
    }
}
