//! Pagination cursor shapes
//!
//! A cursor is one of two shapes, and each paginator only ever accepts its
//! own. The shapes are a closed sum type so the codec and both paginators
//! match on them exhaustively.

use serde::{Deserialize, Serialize};

use crate::{ElementKey, SnapshotId};

/// Position of a limit/offset walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffsetCursor {
    #[serde(rename = "l")]
    pub limit: usize,
    #[serde(rename = "o")]
    pub offset: usize,
}

impl OffsetCursor {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// First page of a walk with the given limit.
    pub fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }
}

/// Position of a snapshot walk.
///
/// `key` is the element the page starts at (inclusive); it is `None` only
/// for the first page of an empty snapshot. `page_size` is pinned for the
/// whole walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotCursor {
    #[serde(rename = "sid")]
    pub snapshot_id: SnapshotId,
    #[serde(rename = "k")]
    pub key: Option<ElementKey>,
    #[serde(rename = "n")]
    pub page_size: usize,
}

impl SnapshotCursor {
    pub fn new(snapshot_id: SnapshotId, key: Option<ElementKey>, page_size: usize) -> Self {
        Self {
            snapshot_id,
            key,
            page_size,
        }
    }
}

/// An opaque pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    #[serde(rename = "lo")]
    LimitOffset(OffsetCursor),
    #[serde(rename = "ss")]
    Snapshot(SnapshotCursor),
}

impl Cursor {
    /// Human-readable shape name, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Cursor::LimitOffset(_) => Self::LIMIT_OFFSET,
            Cursor::Snapshot(_) => Self::SNAPSHOT,
        }
    }

    pub const LIMIT_OFFSET: &'static str = "limit/offset";
    pub const SNAPSHOT: &'static str = "snapshot";
}

impl From<OffsetCursor> for Cursor {
    fn from(cursor: OffsetCursor) -> Self {
        Cursor::LimitOffset(cursor)
    }
}

impl From<SnapshotCursor> for Cursor {
    fn from(cursor: SnapshotCursor) -> Self {
        Cursor::Snapshot(cursor)
    }
}
