//! Role records listed on the roles screen and offered in user forms.

use serde::{Deserialize, Deserializer, Serialize};

use super::{NAME_FIELD, Resource, ResourceId, ResourceKind};

/// Role record as returned by `GET /api/roles`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Role {
    /// Role id; the backend names the column `roles_id`.
    #[serde(rename = "roles_id", alias = "id")]
    pub id: ResourceId,
    /// Machine name.
    pub name: String,
    /// Label shown in selects.
    pub display_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the role is active. Sent as a boolean or as `0`/`1`.
    #[serde(deserialize_with = "deserialize_status")]
    pub status: bool,
    /// Creation timestamp as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp as sent by the backend.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Role {
    /// Badge label for the status column.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.status { "Active" } else { "Inactive" }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusWire {
    Flag(bool),
    Number(i64),
    Text(String),
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StatusWire::deserialize(deserializer)? {
        StatusWire::Flag(flag) => flag,
        StatusWire::Number(value) => value != 0,
        StatusWire::Text(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "active"
        ),
    })
}

/// Body for role create/update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePayload {
    /// Machine name.
    pub name: String,
    /// Label shown in selects.
    pub display_name: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the role is active.
    pub status: bool,
}

impl Resource for Role {
    type Payload = RolePayload;

    const KIND: ResourceKind = ResourceKind::Roles;
    const CONFLICT_FIELD: &'static str = NAME_FIELD;
}
