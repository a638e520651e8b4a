//! Authentication primitives: login and registration inputs, the bearer
//! token, and the persisted credential.
//!
//! Passwords and tokens are held in [`Zeroizing`] buffers and never appear in
//! `Debug` output. Logs refer to a token only through its fingerprint.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::ResourceId;

/// Form field receiving email-related messages.
pub const EMAIL_FIELD: &str = "email";
/// Form field receiving password-related messages.
pub const PASSWORD_FIELD: &str = "password";
/// Form field receiving name-related messages.
pub const NAME_FIELD: &str = "name";

/// Domain error returned when login or registration inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl CredentialsValidationError {
    /// Form field the error belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => NAME_FIELD,
            Self::EmptyEmail => EMAIL_FIELD,
            Self::EmptyPassword => PASSWORD_FIELD,
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

fn require_email(email: &str) -> Result<String, CredentialsValidationError> {
    let normalized = email.trim();
    if normalized.is_empty() {
        return Err(CredentialsValidationError::EmptyEmail);
    }
    Ok(normalized.to_owned())
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use admin_console::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin@example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "admin@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: require_email(email)?,
            password: require_password(password)?,
        })
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// JSON body for `POST /api/login`.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        json!({ "email": self.email, "password": self.password.as_str() })
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated registration request for `POST /api/register`.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    name: String,
    email: String,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Construct a registration request from raw form inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            email: require_email(email)?,
            password: require_password(password)?,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// JSON body for `POST /api/register`.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "password": self.password.as_str(),
        })
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token issued by the backend at login.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a raw token value.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Raw token for the `Authorization` header and storage only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the token holds no usable value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Short SHA-256 fingerprint, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(12);
        encoded
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({})", self.fingerprint())
    }
}

/// Lightweight profile of the logged-in user, persisted next to the token.
///
/// Only `id`, `name`, and `email` are kept; other fields in the login
/// response are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    pub id: ResourceId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl UserProfile {
    /// Up to two uppercase initials of the display name, `??` when empty.
    #[must_use]
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if initials.is_empty() {
            "??".to_owned()
        } else {
            initials
        }
    }
}

/// Token plus profile establishing identity for subsequent requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token.
    pub token: AuthToken,
    /// Stored profile.
    pub user: UserProfile,
}

/// Decoded `data` of a successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginSuccess {
    /// Issued bearer token.
    pub token: AuthToken,
    /// Authenticated user's profile.
    pub user: UserProfile,
}

impl From<LoginSuccess> for Credential {
    fn from(value: LoginSuccess) -> Self {
        Self {
            token: value.token,
            user: value.user,
        }
    }
}
