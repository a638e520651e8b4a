//! Resource identity and per-type metadata for the query layer.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Stable identifier of a server-owned record.
///
/// The backend identifies users by numeric id and some records by opaque
/// strings; both shapes decode from JSON without a tag.
///
/// # Examples
/// ```
/// use admin_console::domain::ResourceId;
///
/// assert_eq!(ResourceId::parse("42"), ResourceId::Numeric(42));
/// assert_eq!(ResourceId::parse("u-7f3a"), ResourceId::Opaque("u-7f3a".to_owned()));
/// assert!(ResourceId::Numeric(0).is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// Numeric database id.
    Numeric(u64),
    /// Opaque identifier string.
    Opaque(String),
}

impl ResourceId {
    /// Interpret raw input, preferring the numeric form for all-digit values.
    #[must_use]
    pub fn parse(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        match trimmed.parse::<u64>() {
            Ok(value) => Self::Numeric(value),
            Err(_) => Self::Opaque(trimmed.to_owned()),
        }
    }

    /// Whether the id is effectively absent: numeric zero or a blank string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Numeric(value) => *value == 0,
            Self::Opaque(value) => value.trim().is_empty(),
        }
    }

    /// Narrow an optional id to a present, non-blank one.
    #[must_use]
    pub fn present(id: Option<&Self>) -> Option<&Self> {
        id.filter(|id| !id.is_blank())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Opaque(value) => f.write_str(value),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self::Numeric(value)
    }
}

/// Resource types exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `/api/users`
    Users,
    /// `/api/roles`
    Roles,
}

impl ResourceKind {
    /// Stable name used in cache keys and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Roles => "roles",
        }
    }

    /// Path segments of the collection endpoint below the API root.
    #[must_use]
    pub const fn collection_segments(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["api", "users"],
            Self::Roles => &["api", "roles"],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-owned record type the query layer can list, fetch, and mutate.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Create/update request body.
    type Payload: Serialize + Send + Sync;

    /// Resource type used for endpoints and cache keys.
    const KIND: ResourceKind;

    /// Field a 409 conflict message is attributed to.
    const CONFLICT_FIELD: &'static str;
}
