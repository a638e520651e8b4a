//! Registration form controller.

use std::future::Future;
use std::sync::Arc;

use crate::domain::routing::LOGIN_PATH;
use crate::domain::{AuthApi, RegistrationRequest, SessionController};

use super::{FormView, Notice, Submission, ViewCell, ViewHandle};

const REGISTERED_MESSAGE: &str = "Registration successful, please log in";

/// Values typed into the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFields {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Controller for the registration screen.
pub struct RegisterForm {
    auth: AuthApi,
    session: Arc<SessionController>,
    view: ViewCell<FormView<RegisterFields>>,
}

impl RegisterForm {
    /// Empty registration form.
    #[must_use]
    pub fn new(auth: AuthApi, session: Arc<SessionController>) -> Self {
        Self {
            auth,
            session,
            view: ViewCell::new(FormView::default()),
        }
    }

    /// Change `field` through `apply`, clearing that field's errors.
    pub fn edit(&self, field: &str, apply: impl FnOnce(&mut RegisterFields)) {
        self.view.update(|view| {
            apply(&mut view.fields);
            view.state.field_changed(field);
        });
    }

    /// Current fields and form state.
    #[must_use]
    pub fn snapshot(&self) -> FormView<RegisterFields> {
        self.view.snapshot()
    }

    /// Weak handle to this form's view state.
    #[must_use]
    pub fn handle(&self) -> ViewHandle<FormView<RegisterFields>> {
        self.view.handle()
    }

    /// Submit the current values; on success the user is sent to the login
    /// screen.
    pub fn submit(&self) -> impl Future<Output = Submission> + Send + 'static {
        let prepared = self.view.update(|view| {
            view.state.begin_submit();
            let fields = &view.fields;
            RegistrationRequest::try_from_parts(&fields.name, &fields.email, &fields.password)
                .map_err(|error| view.state.reject_input(&error))
        });
        let auth = self.auth.clone();
        let session = Arc::clone(&self.session);
        let handle = self.view.handle();

        async move {
            let Ok(request) = prepared else {
                return Submission::Failed;
            };
            match auth.register(&request).await {
                Ok(registered) => {
                    let message = registered
                        .message
                        .unwrap_or_else(|| REGISTERED_MESSAGE.to_owned());
                    let outcome = Submission::deliver(&handle, true, |view| {
                        view.state.succeed(Some(Notice::success(message)));
                    });
                    session.navigate(LOGIN_PATH);
                    outcome
                }
                Err(failure) => Submission::deliver(&handle, false, |view| {
                    view.state.apply_failure(&failure);
                }),
            }
        }
    }
}
