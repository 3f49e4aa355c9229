//! Snapshot store trait.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use folio_core::{ConfigError, ElementKey, FolioResult, Snapshot, SnapshotId, Timestamp};

/// Persistence for frozen key orderings.
///
/// Snapshots are written once and never mutated, so implementations need no
/// cross-row locking. Two requirements matter:
///
/// - `create` is atomic: no reader ever observes a snapshot with a missing
///   or partial key list.
/// - Deleting concurrently with `get` is safe: a reader either sees the
///   whole snapshot or `None`.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist an ordered key list and return its generated id.
    async fn create(&self, ordered_keys: Vec<ElementKey>) -> FolioResult<SnapshotId>;

    /// Look up a snapshot. Expired or unknown ids return `Ok(None)`.
    async fn get(&self, id: SnapshotId) -> FolioResult<Option<Snapshot>>;

    /// Delete every snapshot created strictly before `cutoff`.
    ///
    /// Returns the number of snapshots deleted.
    async fn delete_created_before(&self, cutoff: Timestamp) -> FolioResult<u64>;

    /// Number of snapshots currently stored.
    async fn count(&self) -> FolioResult<u64>;

    /// Delete every snapshot older than `ttl`.
    async fn delete_older_than(&self, ttl: Duration) -> FolioResult<u64> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| ConfigError::InvalidValue {
            field: "ttl".to_string(),
            value: format!("{:?}", ttl),
            reason: e.to_string(),
        })?;
        let cutoff = Utc::now()
            .checked_sub_signed(ttl)
            .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
        self.delete_created_before(cutoff).await
    }
}
