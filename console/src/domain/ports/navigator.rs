//! Driven port used by services to move the user to another screen.

use crate::domain::SessionState;

/// Screen navigation. Implementations apply the route guard for the supplied
/// session state before rendering.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Push `path` onto the history and render whatever the guard allows.
    fn navigate(&self, path: &str, session: SessionState);
}
