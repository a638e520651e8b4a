//! In-process credential store for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{decode_credential, encode_profile};
use crate::domain::Credential;
use crate::domain::ports::{CredentialStore, CredentialStoreError, TOKEN_KEY, USER_KEY};

/// [`CredentialStore`] holding raw key values in memory.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<&'static str, String>>,
}

impl MemoryCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError::Serialization`] when the profile
    /// cannot be encoded.
    pub fn with_credential(credential: &Credential) -> Result<Self, CredentialStoreError> {
        let store = Self::new();
        store.save(credential)?;
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<&'static str, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        let profile = encode_profile(&credential.user)?;
        let mut entries = self.lock();
        entries.insert(USER_KEY, profile);
        entries.insert(TOKEN_KEY, credential.token.expose().to_owned());
        Ok(())
    }

    fn read(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let entries = self.lock();
        Ok(decode_credential(
            entries.get(TOKEN_KEY).cloned(),
            entries.get(USER_KEY).cloned(),
        ))
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        let mut entries = self.lock();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
        Ok(())
    }
}
