//! Snapshot pagination: freeze the order once, then index into it.
//!
//! The first request of a walk materializes the source's full key order and
//! stores it as an immutable [`Snapshot`]. Every later page slices that
//! frozen sequence and resolves the slice against live data, so re-sorts
//! and inserts never shift a walk. Deleted elements drop out of their page.
//!
//! If the snapshot is gone (swept, or never existed in this store) the walk
//! re-baselines: a fresh snapshot of the current order is taken and the
//! walk restarts at its first element. Clients never see an error for an
//! expired walk.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use folio_core::{
    CursorCodec, ElementKey, FolioResult, PaginationConfig, Snapshot, SnapshotCursor, SnapshotId,
};
use folio_storage::SnapshotStore;

use crate::page::Page;
use crate::request::PageRequest;
use crate::source::KeyedSource;

/// Paginator over frozen key orderings.
#[derive(Clone)]
pub struct SnapshotPaginator {
    store: Arc<dyn SnapshotStore>,
    config: PaginationConfig,
}

impl SnapshotPaginator {
    pub fn new(store: Arc<dyn SnapshotStore>, config: PaginationConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Serve one page of a snapshot walk.
    pub async fn paginate<S>(&self, request: &PageRequest, source: &S) -> FolioResult<Page<S::Element>>
    where
        S: KeyedSource + ?Sized,
    {
        let (snapshot, index, page_size) = match request.cursor.as_deref() {
            None => {
                let page_size = self.config.effective_page_size(request.page_size);
                (self.take_snapshot(source, page_size).await?, 0, page_size)
            }
            Some(token) => {
                let cursor = CursorCodec::decode_snapshot(token)?;
                let page_size = self.config.clamp(cursor.page_size);
                match self.store.get(cursor.snapshot_id).await? {
                    Some(snapshot) => {
                        let index = start_index(&snapshot, cursor.key.as_ref());
                        (snapshot, index, page_size)
                    }
                    None => {
                        tracing::debug!(
                            snapshot_id = %cursor.snapshot_id,
                            page_size,
                            "Snapshot expired, re-baselining walk"
                        );
                        (self.take_snapshot(source, page_size).await?, 0, page_size)
                    }
                }
            }
        };

        let keys = snapshot.keys();
        let end = index.saturating_add(page_size).min(keys.len());
        let slice = &keys[index..end];
        let results = source.resolve(slice).await?;

        let id = snapshot.id();
        let next = keys.get(end).map(|key| cursor_at(id, Some(key), page_size));
        let previous = (index > 0).then(|| {
            let start = index.saturating_sub(page_size);
            cursor_at(id, keys.get(start), page_size)
        });

        Ok(Page::new(previous, next, results))
    }

    async fn take_snapshot<S>(&self, source: &S, page_size: usize) -> FolioResult<Snapshot>
    where
        S: KeyedSource + ?Sized,
    {
        let keys = dedup_keys(source.materialize_order().await?);
        let id = self.store.create(keys.clone()).await?;
        tracing::debug!(
            snapshot_id = %id,
            keys = keys.len(),
            page_size,
            "Created pagination snapshot"
        );

        // Page from the keys already in hand; a sweep racing this request
        // must not turn the first page into a miss.
        Ok(Snapshot::new(id, keys, Utc::now()))
    }
}

impl std::fmt::Debug for SnapshotPaginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotPaginator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Drop repeated keys, keeping the first occurrence.
///
/// Cursors locate a page by key, so a key may appear only once in a
/// snapshot.
fn dedup_keys(keys: Vec<ElementKey>) -> Vec<ElementKey> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

/// Index of the page start. Missing keys fall back to the beginning.
fn start_index(snapshot: &Snapshot, key: Option<&ElementKey>) -> usize {
    key.and_then(|k| snapshot.position(k)).unwrap_or(0)
}

fn cursor_at(
    snapshot_id: SnapshotId,
    key: Option<&ElementKey>,
    page_size: usize,
) -> folio_core::Cursor {
    SnapshotCursor::new(snapshot_id, key.cloned(), page_size).into()
}
