//! Wire envelopes shared by every backend endpoint.
//!
//! Success bodies look like `{ "data": .., "message": ".." }`; failure bodies
//! like `{ "message": "..", "data": { "field": ["msg"] } }`. Both decode
//! leniently so classification never fails on a missing member.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{Failure, FieldErrorSet};

/// Decoded success body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SuccessEnvelope {
    pub(crate) data: Value,
    pub(crate) message: Option<String>,
}

#[derive(Deserialize)]
struct SuccessDto {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

impl SuccessEnvelope {
    /// Decode a 2xx body. An empty body is an envelope without data.
    pub(crate) fn decode(body: &[u8]) -> Result<Self, Failure> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self {
                data: Value::Null,
                message: None,
            });
        }
        let dto: SuccessDto = serde_json::from_slice(body).map_err(Failure::unexpected_shape)?;
        Ok(Self {
            data: dto.data,
            message: dto.message,
        })
    }

    /// Decode `data` into `T`.
    pub(crate) fn data_as<T: DeserializeOwned>(&self) -> Result<T, Failure> {
        T::deserialize(&self.data).map_err(Failure::unexpected_shape)
    }
}

/// Decoded failure body. Unparseable bodies decode to an empty envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ErrorEnvelope {
    pub(crate) message: Option<String>,
    pub(crate) data: Option<Value>,
}

impl ErrorEnvelope {
    pub(crate) fn decode(body: &[u8]) -> Self {
        let Ok(Value::Object(mut object)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let message = match object.remove("message") {
            Some(Value::String(message)) if !message.trim().is_empty() => Some(message),
            _ => None,
        };
        Self {
            message,
            data: object.remove("data"),
        }
    }

    /// Field errors from `data`, when it is a map of field to message list.
    ///
    /// A bare string value counts as a one-element list; entries of any other
    /// shape are skipped.
    pub(crate) fn field_errors(&self) -> FieldErrorSet {
        let Some(Value::Object(map)) = &self.data else {
            return FieldErrorSet::new();
        };
        map.iter()
            .filter_map(|(field, value)| {
                let messages: Vec<String> = match value {
                    Value::String(message) => vec![message.clone()],
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_owned))
                        .collect(),
                    _ => return None,
                };
                Some((field.clone(), messages))
            })
            .collect()
    }
}
