//! Identity types for snapshots and paginated elements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Snapshot identifier using UUIDv7 for timestamp-sortable IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Generate a new UUIDv7 snapshot id.
    pub fn now_v7() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Raw bytes, used as the storage key.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl From<Uuid> for SnapshotId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique key of a paginated element.
///
/// The engine knows nothing about the elements it pages over beyond this
/// key. Serialized externally tagged with one-letter tags so a text key that
/// happens to look like a UUID never round-trips as [`ElementKey::Uuid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKey {
    #[serde(rename = "i")]
    Int(i64),
    #[serde(rename = "u")]
    Uuid(Uuid),
    #[serde(rename = "s")]
    Text(String),
}

impl From<i64> for ElementKey {
    fn from(value: i64) -> Self {
        ElementKey::Int(value)
    }
}

impl From<Uuid> for ElementKey {
    fn from(value: Uuid) -> Self {
        ElementKey::Uuid(value)
    }
}

impl From<String> for ElementKey {
    fn from(value: String) -> Self {
        ElementKey::Text(value)
    }
}

impl From<&str> for ElementKey {
    fn from(value: &str) -> Self {
        ElementKey::Text(value.to_string())
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Int(v) => write!(f, "{}", v),
            ElementKey::Uuid(v) => write!(f, "{}", v),
            ElementKey::Text(v) => write!(f, "{}", v),
        }
    }
}
