//! Pure route guard deciding what a path shows for a session state.

use crate::domain::SessionState;

use super::route::{
    ADMIN_DASHBOARD_PATH, ADMIN_PATH, LOGIN_PATH, Screen, is_admin_path, is_auth_only_path,
    normalise,
};

/// Decision for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render the screen at the requested path.
    Render(Screen),
    /// Replace the current history entry with `to` and guard it again.
    Redirect {
        /// Target path.
        to: &'static str,
    },
}

/// Decide what `path` shows under `state`.
///
/// Admin paths require a session, auth-only paths require its absence, and
/// every redirect replaces the current history entry.
///
/// # Examples
/// ```
/// use admin_console::domain::routing::{Navigation, Screen, guard};
/// use admin_console::domain::SessionState;
///
/// assert_eq!(
///     guard("/admin/users", SessionState::Anonymous),
///     Navigation::Redirect { to: "/login" },
/// );
/// assert_eq!(
///     guard("/admin/users", SessionState::Authenticated),
///     Navigation::Render(Screen::Users),
/// );
/// ```
#[must_use]
pub fn guard(path: &str, state: SessionState) -> Navigation {
    let path = normalise(path);
    let authenticated = state.is_authenticated();

    if is_admin_path(&path) {
        if !authenticated {
            return Navigation::Redirect { to: LOGIN_PATH };
        }
        if path == ADMIN_PATH {
            return Navigation::Redirect {
                to: ADMIN_DASHBOARD_PATH,
            };
        }
    } else if authenticated && is_auth_only_path(&path) {
        return Navigation::Redirect {
            to: ADMIN_DASHBOARD_PATH,
        };
    }

    Navigation::Render(Screen::resolve(&path))
}
