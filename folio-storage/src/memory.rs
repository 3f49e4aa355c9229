//! In-memory snapshot store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use folio_core::{ElementKey, FolioResult, Snapshot, SnapshotId, StorageError, Timestamp};

use crate::traits::SnapshotStore;

/// Snapshot store backed by a `HashMap` behind a `RwLock`.
///
/// Suitable for single-process deployments and tests. Snapshots are shared
/// as `Arc` slices, so `get` never copies key lists.
#[derive(Debug, Default, Clone)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<SnapshotId, Snapshot>>>,
}

impl InMemorySnapshotStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a snapshot with an explicit creation time.
    ///
    /// Useful for seeding stores (and for tests that need aged snapshots).
    pub fn insert_at(
        &self,
        ordered_keys: Vec<ElementKey>,
        created_at: Timestamp,
    ) -> FolioResult<SnapshotId> {
        let id = SnapshotId::now_v7();
        let snapshot = Snapshot::new(id, ordered_keys, created_at);

        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        if snapshots.contains_key(&id) {
            return Err(StorageError::InsertFailed {
                reason: format!("snapshot {} already exists", id),
            }
            .into());
        }
        snapshots.insert(id, snapshot);
        Ok(id)
    }

    /// Remove every snapshot.
    pub fn clear(&self) -> FolioResult<()> {
        self.snapshots
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .clear();
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn create(&self, ordered_keys: Vec<ElementKey>) -> FolioResult<SnapshotId> {
        self.insert_at(ordered_keys, Utc::now())
    }

    async fn get(&self, id: SnapshotId) -> FolioResult<Option<Snapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(snapshots.get(&id).cloned())
    }

    async fn delete_created_before(&self, cutoff: Timestamp) -> FolioResult<u64> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        let before = snapshots.len();
        snapshots.retain(|_, s| s.created_at() >= cutoff);
        Ok((before - snapshots.len()) as u64)
    }

    async fn count(&self) -> FolioResult<u64> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(snapshots.len() as u64)
    }
}
