//! Normalised failure taxonomy for resource access.
//!
//! Backend failures reach the console in several shapes: structured 422
//! validation maps, 409 conflicts carrying only a message, authorisation and
//! lookup failures, and transport errors without any response at all. The
//! query layer classifies each of them exactly once into [`Failure`]; form
//! controllers pattern-match on the closed variant set and never inspect raw
//! HTTP statuses.

use thiserror::Error;

use super::FieldErrorSet;

/// Message used when the backend supplies none.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// Title used for validation failures without a server message.
pub const VALIDATION_TITLE: &str = "Validation Failed";

/// Classified outcome of a failed request.
///
/// # Examples
/// ```
/// use admin_console::domain::{Failure, FieldErrorSet};
///
/// let failure = Failure::Conflict {
///     message: "Email already exists".to_owned(),
///     fields: FieldErrorSet::single("email", "Email already exists"),
/// };
/// assert_eq!(
///     failure.field_errors().and_then(|fields| fields.first("email")),
///     Some("Email already exists"),
/// );
/// assert!(!failure.is_generic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Structured per-field validation errors (status 422).
    #[error("{}", .message.as_deref().unwrap_or(VALIDATION_TITLE))]
    Validation {
        /// Summary message from the server, if any.
        message: Option<String>,
        /// Field errors exactly as the server reported them.
        fields: FieldErrorSet,
    },
    /// Conflict with existing data (status 409), attributed to one field.
    #[error("{message}")]
    Conflict {
        /// Server message.
        message: String,
        /// Single-field attribution of the message.
        fields: FieldErrorSet,
    },
    /// Missing or rejected credentials (status 401).
    #[error("{message}")]
    Auth {
        /// Server message.
        message: String,
    },
    /// The addressed resource does not exist (status 404).
    #[error("{message}")]
    NotFound {
        /// Server message.
        message: String,
    },
    /// Any other non-success status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server message or the fallback.
        message: String,
    },
    /// No usable response: network failure, timeout, or unexpected shape.
    #[error("{message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },
}

impl Failure {
    /// Build a transport failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a failure for a response body that could not be decoded.
    #[must_use]
    pub fn unexpected_shape(detail: impl std::fmt::Display) -> Self {
        Self::transport(format!("unexpected response shape: {detail}"))
    }

    /// Field errors to render inline, for validation and conflict failures.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrorSet> {
        match self {
            Self::Validation { fields, .. } | Self::Conflict { fields, .. } => Some(fields),
            Self::Auth { .. }
            | Self::NotFound { .. }
            | Self::Rejected { .. }
            | Self::Transport { .. } => None,
        }
    }

    /// Human-readable message for notices.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. } => message.as_deref().unwrap_or(VALIDATION_TITLE),
            Self::Conflict { message, .. }
            | Self::Auth { message }
            | Self::NotFound { message }
            | Self::Rejected { message, .. }
            | Self::Transport { message } => message.as_str(),
        }
    }

    /// Whether the failure ends the current session.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Whether the failure has no field attribution and is shown as a
    /// transient notice only.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Transport { .. })
    }
}
