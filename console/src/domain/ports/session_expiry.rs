//! Port through which the query layer reports an authorisation failure.
//!
//! A 401 on a protected call means the stored token expired or was revoked;
//! the session treats that as fatal rather than retryable. The failure only
//! counts against the session the request was issued under, so callers
//! capture a [`SessionGeneration`] before sending and hand it back on expiry.

use std::fmt;

/// Identifies one span of session state.
///
/// Every login, logout, and expiry moves the session to a new generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    /// Generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiver of implicit session expiry.
#[cfg_attr(test, mockall::automock)]
pub trait SessionExpiry: Send + Sync {
    /// Generation in force right now.
    fn generation(&self) -> SessionGeneration;

    /// End the session after the backend rejected a request issued under
    /// `issued`. Does nothing once the session has moved on.
    fn expire(&self, issued: SessionGeneration);
}
