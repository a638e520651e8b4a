//! Form controllers for the login, registration, and user screens.
//!
//! Each controller owns a [`ViewCell`] holding the typed values and the
//! [`FormState`] rendered next to them. `submit` prepares the request
//! synchronously and returns a future that reports back through a
//! [`ViewHandle`], so a result arriving after the view is gone is dropped.

mod login;
mod register;
mod state;
mod user;
mod view;

pub use login::{LoginFields, LoginForm};
pub use register::{RegisterFields, RegisterForm};
pub use state::{FormState, Notice, NoticeVariant};
pub use user::{UserFields, UserForm, UserFormMode, delete_user};
pub use view::{FormView, ViewCell, ViewHandle};

/// How a submission ended, from the view's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The backend accepted the request and the view was updated.
    Succeeded,
    /// The request was rejected, locally or by the backend.
    Failed,
    /// The view was dropped before the result arrived.
    Detached,
}

impl Submission {
    pub(crate) fn deliver<S>(
        handle: &ViewHandle<S>,
        succeeded: bool,
        apply: impl FnOnce(&mut S),
    ) -> Self {
        match handle.update(apply) {
            None => Self::Detached,
            Some(()) if succeeded => Self::Succeeded,
            Some(()) => Self::Failed,
        }
    }

    /// Whether the backend accepted the request and the view saw it.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}
