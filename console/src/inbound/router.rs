//! History-keeping router driving the route guard.
//!
//! Each navigation pushes a history entry and then guards it. A redirect
//! replaces the entry it came from, so going back never lands on a path that
//! would redirect again.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::SessionState;
use crate::domain::ports::Navigator;
use crate::domain::routing::{Navigation, Screen, guard, normalise};

const MAX_REDIRECTS: usize = 4;

/// What the router is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteView {
    /// Path of the current history entry.
    pub path: String,
    /// Screen rendered for it.
    pub screen: Screen,
}

/// Router with a linear history stack.
pub struct Router {
    history: Mutex<Vec<String>>,
    view: watch::Sender<Option<RouteView>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router with an empty history.
    #[must_use]
    pub fn new() -> Self {
        let (view, _) = watch::channel(None);
        Self {
            history: Mutex::new(Vec::new()),
            view,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push `path` and render what the guard allows for `state`.
    pub fn visit(&self, path: &str, state: SessionState) -> RouteView {
        let mut history = self.lock();
        history.push(normalise(path));
        self.settle(&mut history, state)
    }

    /// Pop the current entry and re-guard the previous one. Returns `None`
    /// when there is nothing to go back to.
    pub fn back(&self, state: SessionState) -> Option<RouteView> {
        let mut history = self.lock();
        if history.len() < 2 {
            return None;
        }
        history.pop();
        Some(self.settle(&mut history, state))
    }

    /// Re-guard the current entry, typically after a session change.
    pub fn reevaluate(&self, state: SessionState) -> Option<RouteView> {
        let mut history = self.lock();
        if history.is_empty() {
            return None;
        }
        Some(self.settle(&mut history, state))
    }

    /// Currently rendered route.
    #[must_use]
    pub fn current(&self) -> Option<RouteView> {
        self.view.borrow().clone()
    }

    /// Snapshot of the history, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Follow rendered routes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<RouteView>> {
        self.view.subscribe()
    }

    fn settle(&self, history: &mut [String], state: SessionState) -> RouteView {
        let Some(top) = history.last_mut() else {
            return self.publish(String::new(), Screen::NotFound);
        };
        for _ in 0..MAX_REDIRECTS {
            match guard(top, state) {
                Navigation::Render(screen) => return self.publish(top.clone(), screen),
                Navigation::Redirect { to } => {
                    debug!(from = %top, to, %state, "redirecting");
                    to.clone_into(top);
                }
            }
        }
        warn!(path = %top, %state, "redirect limit reached");
        self.publish(top.clone(), Screen::NotFound)
    }

    fn publish(&self, path: String, screen: Screen) -> RouteView {
        let view = RouteView { path, screen };
        self.view.send_replace(Some(view.clone()));
        view
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str, session: SessionState) {
        self.visit(path, session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::routing::{ADMIN_DASHBOARD_PATH, HOME_PATH, LOGIN_PATH};
    use rstest::rstest;

    #[rstest]
    fn anonymous_admin_visit_lands_on_login_without_a_back_loop() {
        let router = Router::new();
        router.visit(HOME_PATH, SessionState::Anonymous);

        let view = router.visit("/admin/users", SessionState::Anonymous);

        assert_eq!(view.screen, Screen::Login);
        assert_eq!(router.history(), [HOME_PATH, LOGIN_PATH]);
        let back = router.back(SessionState::Anonymous).expect("previous entry");
        assert_eq!(back.screen, Screen::Home);
    }

    #[rstest]
    fn admin_index_redirects_to_the_dashboard() {
        let router = Router::new();

        let view = router.visit("/admin", SessionState::Authenticated);

        assert_eq!(view.path, ADMIN_DASHBOARD_PATH);
        assert_eq!(view.screen, Screen::Dashboard);
    }

    #[rstest]
    fn reevaluation_follows_session_changes() {
        let router = Router::new();
        router.visit("/admin/roles", SessionState::Authenticated);

        let view = router
            .reevaluate(SessionState::Anonymous)
            .expect("current entry");

        assert_eq!(view.screen, Screen::Login);
        assert_eq!(router.history(), [LOGIN_PATH]);
    }

    #[rstest]
    fn back_on_a_single_entry_does_nothing() {
        let router = Router::new();
        router.visit(HOME_PATH, SessionState::Anonymous);

        assert!(router.back(SessionState::Anonymous).is_none());
        assert!(router.reevaluate(SessionState::Anonymous).is_some());
    }

    #[rstest]
    fn navigator_port_publishes_the_rendered_view() {
        let router = Router::new();
        let mut views = router.subscribe();

        Navigator::navigate(&router, "/login", SessionState::Authenticated);

        assert!(views.has_changed().expect("router alive"));
        let view = views.borrow_and_update().clone().expect("view published");
        assert_eq!(view.screen, Screen::Dashboard);
        assert_eq!(router.current(), Some(view));
    }
}
