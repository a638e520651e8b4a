//! Credential store backed by one directory, one file per key.
//!
//! The directory is opened once as a capability; every later access is
//! relative to it. Writes go to a staging file first and are renamed into
//! place so a reader never observes a half-written key.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use super::{decode_credential, encode_profile};
use crate::domain::Credential;
use crate::domain::ports::{CredentialStore, CredentialStoreError, TOKEN_KEY, USER_KEY};

/// File-backed [`CredentialStore`].
pub struct FileCredentialStore {
    dir: Dir,
    root: PathBuf,
    write_lock: Mutex<()>,
}

fn io_error(root: &Path, key: &str, error: &io::Error) -> CredentialStoreError {
    CredentialStoreError::io(format!("{}: {error}", root.join(key).display()))
}

impl FileCredentialStore {
    /// Open `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CredentialStoreError> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|error| io_error(&root, "", &error))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|error| io_error(&root, "", &error))?;
        Ok(Self {
            dir,
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn read_key(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        match self.dir.read_to_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(&self.root, key, &error)),
        }
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        let staging = format!(".{key}.tmp-{}", Uuid::new_v4().simple());
        self.dir
            .write(&staging, value.as_bytes())
            .map_err(|error| io_error(&self.root, &staging, &error))?;
        self.dir.rename(&staging, &self.dir, key).map_err(|error| {
            let _cleanup = self.dir.remove_file(&staging);
            io_error(&self.root, key, &error)
        })
    }

    fn remove_key(&self, key: &str) -> Result<(), CredentialStoreError> {
        match self.dir.remove_file(key) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&self.root, key, &error)),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        let profile = encode_profile(&credential.user)?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Profile first: a token on disk always has a profile beside it.
        self.write_key(USER_KEY, &profile)?;
        self.write_key(TOKEN_KEY, credential.token.expose())?;
        debug!(root = %self.root.display(), "credential saved");
        Ok(())
    }

    fn read(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let token = self.read_key(TOKEN_KEY)?;
        let user = self.read_key(USER_KEY)?;
        Ok(decode_credential(token, user))
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.remove_key(TOKEN_KEY)?;
        self.remove_key(USER_KEY)?;
        debug!(root = %self.root.display(), "credential cleared");
        Ok(())
    }
}
