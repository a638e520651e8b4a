//! Driven port for the durable credential store.
//!
//! The store keeps two keys, `token` and `user`, and is read synchronously so
//! startup can decide the initial session state before any screen renders.

use crate::domain::Credential;

use super::define_port_error;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the serialised user profile.
pub const USER_KEY: &str = "user";

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// Underlying storage could not be read or written.
        Io { message: String } => "credential storage failed: {message}",
        /// The profile could not be encoded for storage.
        Serialization { message: String } => "credential profile encoding failed: {message}",
    }
}

/// Durable key/value storage for the credential.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Persist token and profile; visible to later reads immediately.
    fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError>;

    /// Read the stored credential, `None` when absent or unusable.
    fn read(&self) -> Result<Option<Credential>, CredentialStoreError>;

    /// Remove both keys. Missing keys are not an error.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}
