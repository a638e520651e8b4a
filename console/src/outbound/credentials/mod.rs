//! Credential store adapters.
//!
//! Both adapters keep the raw `token` and `user` strings and share the rules
//! for turning them back into a [`Credential`].

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use tracing::warn;

use crate::domain::ports::CredentialStoreError;
use crate::domain::{AuthToken, Credential, UserProfile};

/// Rebuild a credential from stored strings.
///
/// A missing or blank token means no credential. A token without a readable
/// profile is treated the same way, with a warning, so the session never
/// starts authenticated for a user it cannot name.
pub(crate) fn decode_credential(token: Option<String>, user: Option<String>) -> Option<Credential> {
    let token = token.map(AuthToken::new).filter(|token| !token.is_blank())?;
    let Some(user) = user else {
        warn!(token = %token.fingerprint(), "stored token has no profile; ignoring it");
        return None;
    };
    match serde_json::from_str::<UserProfile>(&user) {
        Ok(profile) => Some(Credential {
            token,
            user: profile,
        }),
        Err(error) => {
            warn!(token = %token.fingerprint(), %error, "stored profile unreadable; ignoring it");
            None
        }
    }
}

/// Serialise the profile the way it is stored under `user`.
pub(crate) fn encode_profile(profile: &UserProfile) -> Result<String, CredentialStoreError> {
    serde_json::to_string(profile)
        .map_err(|error| CredentialStoreError::serialization(error.to_string()))
}
