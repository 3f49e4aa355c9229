//! Frozen key orderings

use std::sync::Arc;

use crate::{ElementKey, SnapshotId, Timestamp};

/// An immutable, ordered list of element keys captured at a point in time.
///
/// The key list is shared behind an `Arc`, so handing a snapshot to many
/// concurrent readers never copies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    id: SnapshotId,
    ordered_keys: Arc<[ElementKey]>,
    created_at: Timestamp,
}

impl Snapshot {
    pub fn new(id: SnapshotId, ordered_keys: impl Into<Arc<[ElementKey]>>, created_at: Timestamp) -> Self {
        Self {
            id,
            ordered_keys: ordered_keys.into(),
            created_at,
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn keys(&self) -> &[ElementKey] {
        &self.ordered_keys
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.ordered_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_keys.is_empty()
    }

    /// Position of `key` in the frozen order, if it was captured.
    pub fn position(&self, key: &ElementKey) -> Option<usize> {
        self.ordered_keys.iter().position(|k| k == key)
    }
}
