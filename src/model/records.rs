use serde::{Deserialize, Serialize};

/// A persisted role in the role-graph security model.
///
/// Identity is the name: two declarations naming the same role resolve to
/// the same record. Parent links and permission grants live in relation
/// tables beside the record, not inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Unique role name.
    pub name: String,

    /// Whether this role is the administrative role. Re-asserted on every
    /// synchronization pass.
    #[serde(default)]
    pub is_administrative: bool,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// A persisted user in the role-graph security model. Permissions come from
/// role membership only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphUser {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Unique login name.
    pub user_name: String,

    #[serde(default = "default_true")]
    pub active: bool,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// A persisted user in the flag-based security model: a single administrator
/// flag instead of role membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagUser {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Unique login name.
    pub user_name: String,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub is_administrator: bool,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

/// Generate a new random record ID (UUIDv4, no dashes).
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Current time as an RFC 3339 string.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
