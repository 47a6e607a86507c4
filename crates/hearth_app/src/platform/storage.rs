//! File-backed analogue of the page's client-local key/value storage.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use hearth_logging::{hearth_info, hearth_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Key under which the banner-dismissal timestamp is persisted. The value is
/// stringified epoch milliseconds.
pub const DISMISSAL_KEY: &str = "install-prompt-dismissed";

const STORE_FILENAME: &str = "local_store.ron";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialize error: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedPrefs {
    entries: BTreeMap<String, String>,
}

/// One ron file of string keys and values, written atomically.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILENAME)
    }

    pub fn read(&self, key: &str) -> Option<String> {
        self.load_prefs().entries.remove(key)
    }

    pub fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut prefs = self.load_prefs();
        prefs.entries.insert(key.to_string(), value.to_string());
        self.save_prefs(&prefs)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut prefs = self.load_prefs();
        if prefs.entries.remove(key).is_some() {
            self.save_prefs(&prefs)?;
        }
        Ok(())
    }

    /// Unreadable or unparsable state degrades to an empty store.
    fn load_prefs(&self) -> PersistedPrefs {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return PersistedPrefs::default();
            }
            Err(err) => {
                hearth_warn!("failed to read local store {:?}: {}", path, err);
                return PersistedPrefs::default();
            }
        };
        match ron::from_str(&content) {
            Ok(prefs) => prefs,
            Err(err) => {
                hearth_warn!("failed to parse local store {:?}: {}", path, err);
                PersistedPrefs::default()
            }
        }
    }

    /// Atomic write: temp file in the same directory, then rename over the
    /// target.
    fn save_prefs(&self, prefs: &PersistedPrefs) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(prefs, pretty)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(self.path()).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}

/// Loads the persisted dismissal timestamp, if any survives parsing.
pub fn load_dismissal(store: &LocalStore) -> Option<u64> {
    let raw = store.read(DISMISSAL_KEY)?;
    match raw.parse::<u64>() {
        Ok(at_ms) => {
            hearth_info!("restored banner dismissal from {} ms", at_ms);
            Some(at_ms)
        }
        Err(err) => {
            hearth_warn!("discarding unparsable dismissal record {:?}: {}", raw, err);
            if let Err(err) = store.remove(DISMISSAL_KEY) {
                hearth_warn!("failed to drop corrupt dismissal record: {}", err);
            }
            None
        }
    }
}

/// Persists a dismissal timestamp; failure is logged and swallowed.
pub fn save_dismissal(store: &LocalStore, at_ms: u64) {
    if let Err(err) = store.write(DISMISSAL_KEY, &at_ms.to_string()) {
        hearth_warn!("failed to persist banner dismissal: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn read_of_missing_store_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.read(DISMISSAL_KEY), None);
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = store();
        store.write("a", "1").expect("write");
        store.write("b", "2").expect("write");
        assert_eq!(store.read("a").as_deref(), Some("1"));
        assert_eq!(store.read("b").as_deref(), Some("2"));
    }

    #[test]
    fn write_overwrites_existing_value() {
        let (_dir, store) = store();
        store.write("a", "1").expect("write");
        store.write("a", "2").expect("write");
        assert_eq!(store.read("a").as_deref(), Some("2"));
    }

    #[test]
    fn remove_deletes_the_key() {
        let (_dir, store) = store();
        store.write("a", "1").expect("write");
        store.remove("a").expect("remove");
        assert_eq!(store.read("a"), None);
    }

    #[test]
    fn corrupt_store_degrades_to_empty() {
        let (dir, store) = store();
        fs::write(dir.path().join(STORE_FILENAME), "not ron at all {{{").expect("corrupt");
        assert_eq!(store.read(DISMISSAL_KEY), None);
        // Writing afterwards replaces the corrupt file.
        store.write("a", "1").expect("write");
        assert_eq!(store.read("a").as_deref(), Some("1"));
    }

    #[test]
    fn dismissal_round_trips_as_stringified_millis() {
        let (_dir, store) = store();
        save_dismissal(&store, 1_234_567);
        assert_eq!(store.read(DISMISSAL_KEY).as_deref(), Some("1234567"));
        assert_eq!(load_dismissal(&store), Some(1_234_567));
    }

    #[test]
    fn unparsable_dismissal_is_discarded_and_dropped() {
        let (_dir, store) = store();
        store.write(DISMISSAL_KEY, "yesterday").expect("write");
        assert_eq!(load_dismissal(&store), None);
        assert_eq!(store.read(DISMISSAL_KEY), None);
    }
}
