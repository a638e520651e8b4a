//! The one place backend failures become [`Failure`] values.
//!
//! Tiers, in order:
//! 1. `422` with a non-empty field map: validation errors verbatim.
//! 2. `409`: the message attributed to the resource's conflict field.
//! 3. Everything else: a generic failure carrying the server message or the
//!    fallback. `401` and `404` keep their own variants so the session and
//!    the screens can react to them.

use crate::domain::ports::{ApiResponse, GatewayError};
use crate::domain::{FALLBACK_MESSAGE, Failure, FieldErrorSet};

use super::envelope::ErrorEnvelope;

const UNPROCESSABLE: u16 = 422;
const CONFLICT: u16 = 409;
const UNAUTHORIZED: u16 = 401;
const NOT_FOUND: u16 = 404;

/// Classify a non-success response.
///
/// `conflict_field` names the form field a `409` message is shown against.
pub(crate) fn classify_response(response: &ApiResponse, conflict_field: &str) -> Failure {
    let envelope = ErrorEnvelope::decode(&response.body);
    let message = envelope
        .message
        .clone()
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());

    match response.status {
        UNPROCESSABLE => {
            let fields = envelope.field_errors();
            if fields.is_empty() {
                Failure::Rejected {
                    status: UNPROCESSABLE,
                    message,
                }
            } else {
                Failure::Validation {
                    message: envelope.message,
                    fields,
                }
            }
        }
        CONFLICT => Failure::Conflict {
            fields: FieldErrorSet::single(conflict_field, message.clone()),
            message,
        },
        UNAUTHORIZED => Failure::Auth { message },
        NOT_FOUND => Failure::NotFound { message },
        status => Failure::Rejected { status, message },
    }
}

/// Classify a failure that produced no response.
pub(crate) fn classify_gateway_error(error: &GatewayError) -> Failure {
    Failure::transport(error.to_string())
}
