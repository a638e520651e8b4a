//! Login form controller.

use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use crate::domain::{
    AuthApi, EMAIL_FIELD, Failure, FieldErrorSet, LoginCredentials, SessionController,
};

use super::{FormView, Submission, ViewCell, ViewHandle};

/// Values typed into the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFields {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Controller for the login screen.
pub struct LoginForm {
    auth: AuthApi,
    session: Arc<SessionController>,
    view: ViewCell<FormView<LoginFields>>,
}

impl LoginForm {
    /// Empty login form.
    #[must_use]
    pub fn new(auth: AuthApi, session: Arc<SessionController>) -> Self {
        Self {
            auth,
            session,
            view: ViewCell::new(FormView::default()),
        }
    }

    /// Change `field` through `apply`, clearing that field's errors.
    pub fn edit(&self, field: &str, apply: impl FnOnce(&mut LoginFields)) {
        self.view.update(|view| {
            apply(&mut view.fields);
            view.state.field_changed(field);
        });
    }

    /// Current fields and form state.
    #[must_use]
    pub fn snapshot(&self) -> FormView<LoginFields> {
        self.view.snapshot()
    }

    /// Weak handle to this form's view state.
    #[must_use]
    pub fn handle(&self) -> ViewHandle<FormView<LoginFields>> {
        self.view.handle()
    }

    /// Submit the current values.
    ///
    /// The returned future owns everything it needs, so it can be spawned and
    /// the form dropped. On success the session transition happens whether or
    /// not the form is still around.
    pub fn submit(&self) -> impl Future<Output = Submission> + Send + 'static {
        let prepared = self.view.update(|view| {
            view.state.begin_submit();
            LoginCredentials::try_from_parts(&view.fields.email, &view.fields.password).map_err(
                |error| {
                    view.state.reject_input(&error);
                },
            )
        });
        let auth = self.auth.clone();
        let session = Arc::clone(&self.session);
        let handle = self.view.handle();

        async move {
            let Ok(credentials) = prepared else {
                return Submission::Failed;
            };
            match auth.login(&credentials).await {
                Ok(success) => match session.complete_login(success) {
                    Ok(()) => Submission::deliver(&handle, true, |view| view.state.succeed(None)),
                    Err(error) => {
                        warn!(%error, "login succeeded but the credential was not stored");
                        let failure = Failure::transport(error.to_string());
                        Submission::deliver(&handle, false, |view| {
                            view.state.apply_failure(&failure);
                        })
                    }
                },
                Err(Failure::Auth { message }) => Submission::deliver(&handle, false, |view| {
                    view.state
                        .reject_fields(FieldErrorSet::single(EMAIL_FIELD, message));
                }),
                Err(failure) => Submission::deliver(&handle, false, |view| {
                    view.state.apply_failure(&failure);
                }),
            }
        }
    }
}
