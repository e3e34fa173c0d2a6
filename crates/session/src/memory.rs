//! In-memory session store for tests and embedding.

use std::sync::Mutex;

use bento_core::CredentialRecord;

use crate::error::SessionError;
use crate::traits::SessionStore;

#[derive(Default)]
struct Slots {
    credentials: Option<CredentialRecord>,
    profile: Option<serde_json::Value>,
}

/// Session store holding records in process memory.
#[derive(Default)]
pub struct MemorySessionStore {
    slots: Mutex<Slots>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a credential record already present.
    pub fn with_credentials(record: CredentialRecord) -> Self {
        MemorySessionStore {
            slots: Mutex::new(Slots {
                credentials: Some(record),
                profile: None,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Slots>, SessionError> {
        self.slots.lock().map_err(|_| SessionError::LockPoisoned)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<CredentialRecord>, SessionError> {
        Ok(self.lock()?.credentials.clone())
    }

    fn store(&self, record: &CredentialRecord) -> Result<(), SessionError> {
        self.lock()?.credentials = Some(record.clone());
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<serde_json::Value>, SessionError> {
        Ok(self.lock()?.profile.clone())
    }

    fn store_profile(&self, profile: &serde_json::Value) -> Result<(), SessionError> {
        self.lock()?.profile = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slots = self.lock()?;
        slots.credentials = None;
        slots.profile = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn last_writer_wins() {
        let store = MemorySessionStore::new();
        store.store(&CredentialRecord::new("first")).unwrap();
        store.store(&CredentialRecord::new("second")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().access_token, "second");
    }

    #[test]
    fn clear_empties_both_slots() {
        let store = MemorySessionStore::with_credentials(CredentialRecord::new("tok"));
        store.store_profile(&serde_json::json!({"role": "admin"})).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.load_profile().unwrap().is_none());
    }
}
