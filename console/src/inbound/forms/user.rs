//! User create/edit form and the delete helper.

use std::future::Future;

use crate::domain::{Failure, QueryOutcome, ResourceClient, ResourceId, User, UserPayload};

use super::{FormView, Notice, Submission, ViewCell, ViewHandle};

const CREATED_MESSAGE: &str = "User created successfully";
const UPDATED_MESSAGE: &str = "User updated successfully";
const DELETED_TITLE: &str = "Deleted";
const DELETED_MESSAGE: &str = "User deleted successfully";

/// Values typed into the user form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFields {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Login handle.
    pub username: String,
    /// Selected role.
    pub role_id: Option<u64>,
    /// Account status.
    pub status: String,
    /// New password; blank keeps the current one on edit.
    pub password: String,
    /// Repeated password.
    pub password_confirmation: String,
}

impl UserFields {
    /// Fields prefilled from `user`, with blank passwords.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            username: user.username.clone().unwrap_or_default(),
            role_id: user.role_id,
            status: user.status.clone().unwrap_or_default(),
            password: String::new(),
            password_confirmation: String::new(),
        }
    }

    fn to_payload(&self) -> UserPayload {
        let mut payload = UserPayload::new(self.name.trim(), self.email.trim());
        if !self.password.is_empty() {
            payload = payload
                .with_password(self.password.as_str())
                .with_password_confirmation(self.password_confirmation.as_str());
        }
        if let Some(username) = non_blank(&self.username) {
            payload = payload.with_username(username);
        }
        if let Some(role_id) = self.role_id {
            payload = payload.with_role_id(role_id);
        }
        if let Some(status) = non_blank(&self.status) {
            payload = payload.with_status(status);
        }
        payload
    }
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|trimmed| !trimmed.is_empty())
}

/// Whether the form creates a user or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFormMode {
    /// `POST /api/users`.
    Create,
    /// `PUT /api/users/:id`.
    Edit(ResourceId),
}

/// Controller for the user create and edit screens.
pub struct UserForm {
    client: ResourceClient<User>,
    mode: UserFormMode,
    view: ViewCell<FormView<UserFields>>,
}

impl UserForm {
    /// Blank form creating a new user.
    #[must_use]
    pub fn create(client: ResourceClient<User>) -> Self {
        Self {
            client,
            mode: UserFormMode::Create,
            view: ViewCell::new(FormView::default()),
        }
    }

    /// Form editing `user`, prefilled from the record.
    #[must_use]
    pub fn edit(client: ResourceClient<User>, user: &User) -> Self {
        Self {
            client,
            mode: UserFormMode::Edit(user.id.clone()),
            view: ViewCell::new(FormView::new(UserFields::from_user(user))),
        }
    }

    /// Fetch the user behind `id` and open it for editing.
    ///
    /// An absent or blank id yields [`QueryOutcome::Disabled`] without a
    /// request.
    pub async fn load(
        client: ResourceClient<User>,
        id: Option<&ResourceId>,
    ) -> Result<QueryOutcome<Self>, Failure> {
        Ok(match client.get_by_id(id).await? {
            QueryOutcome::Disabled => QueryOutcome::Disabled,
            QueryOutcome::Ready(user) => QueryOutcome::Ready(Self::edit(client, &user)),
        })
    }

    /// Create or edit.
    #[must_use]
    pub fn mode(&self) -> &UserFormMode {
        &self.mode
    }

    /// Change `field` through `apply`, clearing that field's errors.
    pub fn edit_field(&self, field: &str, apply: impl FnOnce(&mut UserFields)) {
        self.view.update(|view| {
            apply(&mut view.fields);
            view.state.field_changed(field);
        });
    }

    /// Current fields and form state.
    #[must_use]
    pub fn snapshot(&self) -> FormView<UserFields> {
        self.view.snapshot()
    }

    /// Weak handle to this form's view state.
    #[must_use]
    pub fn handle(&self) -> ViewHandle<FormView<UserFields>> {
        self.view.handle()
    }

    /// Save the current values.
    ///
    /// A created user clears the form; an edited user reloads the fields from
    /// the record the backend returned, or keeps the submitted values when it
    /// returned none.
    pub fn submit(&self) -> impl Future<Output = Submission> + Send + 'static {
        let payload = self.view.update(|view| {
            view.state.begin_submit();
            view.fields.to_payload()
        });
        let client = self.client.clone();
        let mode = self.mode.clone();
        let handle = self.view.handle();

        async move {
            let (result, message) = match &mode {
                UserFormMode::Create => (client.create(&payload).await, CREATED_MESSAGE),
                UserFormMode::Edit(id) => (client.update(id, &payload).await, UPDATED_MESSAGE),
            };
            match result {
                Ok(saved) => Submission::deliver(&handle, true, |view| {
                    match (mode, saved.data) {
                        (UserFormMode::Create, _) => view.fields = UserFields::default(),
                        (UserFormMode::Edit(_), Some(user)) => {
                            view.fields = UserFields::from_user(&user);
                        }
                        (UserFormMode::Edit(_), None) => {
                            view.fields.password.clear();
                            view.fields.password_confirmation.clear();
                        }
                    }
                    view.state.succeed(Some(Notice::success(message)));
                }),
                Err(failure) => Submission::deliver(&handle, false, |view| {
                    view.state.apply_failure(&failure);
                }),
            }
        }
    }
}

/// Delete the user behind `id` and describe the outcome as a notice.
pub async fn delete_user(client: &ResourceClient<User>, id: &ResourceId) -> Notice {
    match client.delete(id).await {
        Ok(_) => Notice::destructive(DELETED_TITLE, DELETED_MESSAGE),
        Err(failure) => Notice::error(&failure),
    }
}
