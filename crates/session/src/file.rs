//! File-backed session store.
//!
//! One JSON file per key under a session directory, mirroring the
//! one-key-per-record layout of browser local storage:
//! `credentials.json` holds the token record, `profile.json` the cached
//! user profile.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bento_core::CredentialRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SessionError;
use crate::traits::SessionStore;

const CREDENTIALS_KEY: &str = "credentials";
const PROFILE_KEY: &str = "profile";

/// Session store persisting records as JSON files in one directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at `dir`. The directory is created lazily
    /// on first write; a missing directory reads as an empty session.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSessionStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let path = self.key_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io(e)),
        };
        let value = serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string_pretty(value).map_err(|e| SessionError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        fs::write(self.key_path(key), raw)?;
        Ok(())
    }

    fn remove_key(&self, key: &str) -> Result<(), SessionError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<CredentialRecord>, SessionError> {
        self.read_key(CREDENTIALS_KEY)
    }

    fn store(&self, record: &CredentialRecord) -> Result<(), SessionError> {
        self.write_key(CREDENTIALS_KEY, record)
    }

    fn load_profile(&self) -> Result<Option<serde_json::Value>, SessionError> {
        self.read_key(PROFILE_KEY)
    }

    fn store_profile(&self, profile: &serde_json::Value) -> Result<(), SessionError> {
        self.write_key(PROFILE_KEY, profile)
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.remove_key(CREDENTIALS_KEY)?;
        self.remove_key(PROFILE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("session"))
    }

    #[test]
    fn missing_directory_reads_as_empty_session() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_none());
        assert!(store.load_profile().unwrap().is_none());
    }

    #[test]
    fn credentials_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let record = CredentialRecord::new("tok-1").with_refresh_token("ref-1");
        store.store(&record).unwrap();
        assert_eq!(store.load().unwrap(), Some(record));
    }

    #[test]
    fn store_replaces_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .store(&CredentialRecord::new("old").with_refresh_token("old-ref"))
            .unwrap();
        store.store(&CredentialRecord::new("new")).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "new");
        assert!(loaded.refresh_token.is_none());
    }

    #[test]
    fn clear_removes_credentials_and_profile_together() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.store(&CredentialRecord::new("tok")).unwrap();
        store
            .store_profile(&serde_json::json!({"username": "mgr01", "role": "canteen_manager"}))
            .unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.load_profile().unwrap().is_none());
    }

    #[test]
    fn clear_on_empty_store_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_record_is_reported_not_swallowed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("credentials.json"), "{not json").unwrap();

        match store.load() {
            Err(SessionError::Corrupt { key, .. }) => assert_eq!(key, "credentials"),
            other => panic!("expected Corrupt error, got {:?}", other.map(|_| ())),
        }
    }
}
