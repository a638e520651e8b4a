//! User records managed from the admin screens.

use serde::{Deserialize, Serialize, Serializer};
use zeroize::Zeroizing;

use super::{Resource, ResourceId, ResourceKind};

/// User record as returned by `GET /api/users` and `GET /api/users/:id`.
///
/// Optional fields are tolerated missing; unknown fields are ignored so the
/// console keeps working when the backend adds columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// User id.
    pub id: ResourceId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Login handle, when the backend tracks one.
    #[serde(default)]
    pub username: Option<String>,
    /// Role name.
    #[serde(default)]
    pub role: Option<String>,
    /// Role id.
    #[serde(default)]
    pub role_id: Option<u64>,
    /// Account status such as `active`.
    #[serde(default)]
    pub status: Option<String>,
}

impl User {
    /// Whether the account status reads `active`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("active"))
    }
}

impl Resource for User {
    type Payload = UserPayload;

    const KIND: ResourceKind = ResourceKind::Users;
    const CONFLICT_FIELD: &'static str = super::EMAIL_FIELD;
}

/// Body for `POST /api/users` and `PUT /api/users/:id`.
///
/// A blank password is left off the wire so edits keep the current one.
///
/// # Examples
/// ```
/// use admin_console::domain::UserPayload;
///
/// let payload = UserPayload::new("Ada", "ada@example.com").with_role_id(2);
/// let body = serde_json::to_value(&payload).unwrap();
/// assert!(body.get("password").is_none());
/// assert_eq!(body["role_id"], 2);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct UserPayload {
    name: String,
    email: String,
    password: Zeroizing<String>,
    password_confirmation: Option<Zeroizing<String>>,
    username: Option<String>,
    role_id: Option<u64>,
    status: Option<String>,
}

impl UserPayload {
    /// Start a payload with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Zeroizing::new(String::new()),
            password_confirmation: None,
            username: None,
            role_id: None,
            status: None,
        }
    }

    /// Set the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(password.into());
        self
    }

    /// Set the password confirmation.
    #[must_use]
    pub fn with_password_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.password_confirmation = Some(Zeroizing::new(confirmation.into()));
        self
    }

    /// Set the login handle.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the role id.
    #[must_use]
    pub fn with_role_id(mut self, role_id: u64) -> Self {
        self.role_id = Some(role_id);
        self
    }

    /// Set the account status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

impl std::fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPayload")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("role_id", &self.role_id)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct UserPayloadWire<'a> {
    name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password_confirmation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

impl Serialize for UserPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let password = Some(self.password.as_str()).filter(|value| !value.is_empty());
        UserPayloadWire {
            name: self.name.as_str(),
            email: self.email.as_str(),
            password,
            password_confirmation: password.and(
                self.password_confirmation
                    .as_ref()
                    .map(|value| value.as_str()),
            ),
            username: self.username.as_deref(),
            role_id: self.role_id,
            status: self.status.as_deref(),
        }
        .serialize(serializer)
    }
}
