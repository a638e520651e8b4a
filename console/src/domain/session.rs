//! Session state and the controller that owns its transitions.
//!
//! The controller is created once at startup from whatever the credential
//! store holds, then changes only through login, logout, and expiry. Every
//! transition is published on a watch channel so views and the router can
//! follow it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::cache::QueryCache;
use super::ports::{
    CredentialStore, CredentialStoreError, Navigator, SessionExpiry, SessionGeneration,
};
use super::routing::{ADMIN_DASHBOARD_PATH, LOGIN_PATH};
use super::{Credential, LoginSuccess, UserProfile};

/// Whether a credential is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No credential; only public screens are reachable.
    Anonymous,
    /// A credential is stored; admin screens are reachable.
    Authenticated,
}

impl SessionState {
    /// Whether the state is [`SessionState::Authenticated`].
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Anonymous => "anonymous",
            Self::Authenticated => "authenticated",
        })
    }
}

/// Errors raised by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The credential store rejected the write or removal.
    #[error(transparent)]
    Store(#[from] CredentialStoreError),
}

/// Owner of the session flag.
///
/// Transitions are serialised behind `generation`, so a credential write and
/// the state change it implies are never interleaved with another transition.
pub struct SessionController {
    store: Arc<dyn CredentialStore>,
    cache: Arc<QueryCache>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<SessionState>,
    generation: Mutex<SessionGeneration>,
}

impl SessionController {
    /// Derive the initial state from the credential store.
    ///
    /// A stored credential starts the session authenticated without asking
    /// the backend; the first rejected call ends it.
    #[must_use]
    pub fn init(
        store: Arc<dyn CredentialStore>,
        cache: Arc<QueryCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let initial = match store.read() {
            Ok(Some(credential)) => {
                info!(
                    user_id = %credential.user.id,
                    token = %credential.token.fingerprint(),
                    "restored stored credential"
                );
                SessionState::Authenticated
            }
            Ok(None) => SessionState::Anonymous,
            Err(error) => {
                warn!(%error, "credential store unreadable; starting anonymous");
                SessionState::Anonymous
            }
        };
        let (state, _) = watch::channel(initial);
        Self {
            store,
            cache,
            navigator,
            state,
            generation: Mutex::new(SessionGeneration::default()),
        }
    }

    fn lock_generation(&self) -> MutexGuard<'_, SessionGeneration> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Whether a credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Follow state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Profile of the logged-in user, if one is stored.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        match self.store.read() {
            Ok(credential) => credential.map(|credential| credential.user),
            Err(error) => {
                warn!(%error, "credential store unreadable");
                None
            }
        }
    }

    /// Navigate with the current state applied by the route guard.
    pub fn navigate(&self, path: &str) {
        self.navigator.navigate(path, self.state());
    }

    /// Persist a fresh credential, mark the session authenticated, and move
    /// to the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the credential cannot be saved;
    /// the session then stays as it was.
    pub fn complete_login(&self, success: LoginSuccess) -> Result<(), SessionError> {
        let credential = Credential::from(success);
        {
            let mut generation = self.lock_generation();
            self.store.save(&credential)?;
            *generation = generation.next();
            self.state.send_replace(SessionState::Authenticated);
            info!(
                user_id = %credential.user.id,
                token = %credential.token.fingerprint(),
                generation = %*generation,
                "session authenticated"
            );
        }
        self.navigator
            .navigate(ADMIN_DASHBOARD_PATH, SessionState::Authenticated);
        Ok(())
    }

    /// Clear the credential and every cached query, mark the session
    /// anonymous, and move to the login screen.
    ///
    /// The session ends even when the store cannot be cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the stored credential could not
    /// be removed.
    pub fn logout(&self) -> Result<(), SessionError> {
        let cleared = {
            let mut generation = self.lock_generation();
            let cleared = self.store.clear();
            if let Err(error) = &cleared {
                warn!(%error, "failed to clear stored credential");
            }
            self.end_session(&mut generation, "logout");
            cleared
        };
        self.navigator.navigate(LOGIN_PATH, SessionState::Anonymous);
        cleared.map_err(SessionError::from)
    }

    fn end_session(&self, generation: &mut SessionGeneration, reason: &'static str) {
        *generation = generation.next();
        self.cache.reset();
        self.state.send_replace(SessionState::Anonymous);
        info!(reason, generation = %*generation, "session ended");
    }
}

impl SessionExpiry for SessionController {
    fn generation(&self) -> SessionGeneration {
        *self.lock_generation()
    }

    fn expire(&self, issued: SessionGeneration) {
        {
            let mut generation = self.lock_generation();
            if *generation != issued {
                debug!(
                    %issued,
                    current = %*generation,
                    "ignoring rejection from an earlier session"
                );
                return;
            }
            if !self.state().is_authenticated() {
                return;
            }
            if let Err(error) = self.store.clear() {
                warn!(%error, "failed to clear expired credential");
            }
            self.end_session(&mut generation, "expired");
        }
        self.navigator.navigate(LOGIN_PATH, SessionState::Anonymous);
    }
}
