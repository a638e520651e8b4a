//! Per-form UI state: inline field errors, a transient notice, and the
//! pending flag.

use crate::domain::{
    CredentialsValidationError, FALLBACK_MESSAGE, Failure, FieldErrorSet, VALIDATION_TITLE,
};

const SUCCESS_TITLE: &str = "Success";
const ERROR_TITLE: &str = "Error";

/// Visual treatment of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    /// Confirmation.
    Success,
    /// Failure or irreversible action.
    Destructive,
}

/// Transient, dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Heading.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Visual treatment.
    pub variant: NoticeVariant,
}

impl Notice {
    /// Confirmation titled "Success".
    #[must_use]
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: SUCCESS_TITLE.to_owned(),
            description: description.into(),
            variant: NoticeVariant::Success,
        }
    }

    /// Destructive notice with an explicit title.
    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    /// Generic error notice for `failure`.
    #[must_use]
    pub fn error(failure: &Failure) -> Self {
        let message = failure.message();
        let description = if message.trim().is_empty() {
            FALLBACK_MESSAGE
        } else {
            message
        };
        Self::destructive(ERROR_TITLE, description)
    }
}

/// Error and progress state of one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    errors: FieldErrorSet,
    notice: Option<Notice>,
    pending: bool,
}

impl FormState {
    /// Field errors from the latest attempt.
    #[must_use]
    pub fn errors(&self) -> &FieldErrorSet {
        &self.errors
    }

    /// Current notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start an attempt. Errors and notice from the previous attempt go.
    pub fn begin_submit(&mut self) {
        self.errors = FieldErrorSet::new();
        self.notice = None;
        self.pending = true;
    }

    /// The user edited `field`; only that field's errors are cleared.
    pub fn field_changed(&mut self, field: &str) {
        self.errors.clear_field(field);
    }

    /// Close the current notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Finish the attempt successfully.
    pub fn succeed(&mut self, notice: Option<Notice>) {
        self.pending = false;
        self.notice = notice;
    }

    /// Finish the attempt with `fields` shown inline and no notice.
    pub fn reject_fields(&mut self, fields: FieldErrorSet) {
        self.pending = false;
        self.errors = fields;
    }

    /// Finish the attempt with a client-side input error.
    pub fn reject_input(&mut self, error: &CredentialsValidationError) {
        self.reject_fields(FieldErrorSet::single(error.field(), error.to_string()));
    }

    /// Finish the attempt with a classified failure.
    ///
    /// Validation failures show inline errors plus a notice listing every
    /// message; conflicts show inline errors only; everything else becomes
    /// a destructive notice.
    pub fn apply_failure(&mut self, failure: &Failure) {
        self.pending = false;
        match failure {
            Failure::Validation { message, fields } => {
                let title = message.as_deref().unwrap_or(VALIDATION_TITLE);
                let description = fields.all_messages().collect::<Vec<_>>().join(", ");
                self.errors = fields.clone();
                self.notice = Some(Notice::destructive(title, description));
            }
            Failure::Conflict { fields, .. } => {
                self.errors = fields.clone();
            }
            Failure::Auth { .. }
            | Failure::NotFound { .. }
            | Failure::Rejected { .. }
            | Failure::Transport { .. } => {
                self.notice = Some(Notice::error(failure));
            }
        }
    }
}
