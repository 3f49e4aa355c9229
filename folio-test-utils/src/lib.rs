//! FOLIO Test Utilities
//!
//! Centralized test infrastructure for the FOLIO workspace:
//! - Proptest generators for keys, cursors, and configuration
//! - A mutable in-memory collection implementing both backing-store traits
//! - Fixtures for common pagination scenarios
//! - Custom assertions for FOLIO error variants

pub use folio_storage::InMemorySnapshotStore;

pub use folio_core::{
    Cursor, CursorCodec, CursorError, ElementKey, FolioError, FolioResult, OffsetCursor,
    PaginationConfig, SnapshotCursor, SnapshotId, SourceError, StorageError,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use folio_pagination::{order_by_keys, KeyedSource, OffsetSource};

// ============================================================================
// IN-MEMORY COLLECTION
// ============================================================================

/// One element of an [`InMemoryCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: ElementKey,
    pub name: String,
}

impl Record {
    pub fn new(key: impl Into<ElementKey>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// An ordered, mutable collection standing in for a real query.
///
/// The current order of the list is the query's ordering. Tests mutate it
/// between page requests (insert, delete, reorder) to simulate churn.
/// Both traits resolve to the element's `name`.
#[derive(Debug, Default)]
pub struct InMemoryCollection {
    records: RwLock<Vec<Record>>,
    unavailable: AtomicBool,
    resolve_calls: AtomicUsize,
}

impl InMemoryCollection {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// Collection whose keys are the names themselves.
    pub fn from_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| Record::new(*n, *n)).collect())
    }

    /// Collection of `n` elements keyed `1..=n`, named `item-1` and so on.
    pub fn numbered(n: i64) -> Self {
        Self::new((1..=n).map(|i| Record::new(i, format!("item-{}", i))).collect())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Record>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Record>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Names in the current order.
    pub fn names(&self) -> Vec<String> {
        self.read().iter().map(|r| r.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Insert a record at `index` (clamped to the end).
    pub fn insert(&self, index: usize, record: Record) {
        let mut records = self.write();
        let index = index.min(records.len());
        records.insert(index, record);
    }

    pub fn push(&self, record: Record) {
        self.write().push(record);
    }

    /// Delete the record with `key`. Returns whether it existed.
    pub fn remove(&self, key: &ElementKey) -> bool {
        let mut records = self.write();
        let before = records.len();
        records.retain(|r| &r.key != key);
        records.len() != before
    }

    pub fn reverse(&self) {
        self.write().reverse();
    }

    /// Re-sort with an arbitrary comparator.
    pub fn sort_by<F>(&self, compare: F)
    where
        F: FnMut(&Record, &Record) -> std::cmp::Ordering,
    {
        self.write().sort_by(compare);
    }

    /// Make every call fail with [`SourceError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `resolve` calls served so far.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> FolioResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable {
                reason: "collection marked unavailable".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl KeyedSource for InMemoryCollection {
    type Element = String;

    async fn materialize_order(&self) -> FolioResult<Vec<ElementKey>> {
        self.check_available()?;
        Ok(self.read().iter().map(|r| r.key.clone()).collect())
    }

    async fn resolve(&self, keys: &[ElementKey]) -> FolioResult<Vec<String>> {
        self.check_available()?;
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);

        // Multi-get by key, answered in storage order like a real store.
        let found: HashMap<ElementKey, String> = self
            .read()
            .iter()
            .filter(|r| keys.contains(&r.key))
            .map(|r| (r.key.clone(), r.name.clone()))
            .collect();
        Ok(order_by_keys(keys, found))
    }
}

#[async_trait]
impl OffsetSource for InMemoryCollection {
    type Element = String;

    async fn fetch(&self, offset: usize, limit: usize) -> FolioResult<Vec<String>> {
        self.check_available()?;
        Ok(self
            .read()
            .iter()
            .skip(offset)
            .take(limit)
            .map(|r| r.name.clone())
            .collect())
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating FOLIO types.

    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    /// Generate a random UUID.
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a random SnapshotId.
    pub fn arb_snapshot_id() -> impl Strategy<Value = SnapshotId> {
        arb_uuid().prop_map(SnapshotId::new)
    }

    /// Generate an element key of any variant.
    pub fn arb_element_key() -> impl Strategy<Value = ElementKey> {
        prop_oneof![
            any::<i64>().prop_map(ElementKey::Int),
            arb_uuid().prop_map(ElementKey::Uuid),
            "\\PC{0,24}".prop_map(ElementKey::Text),
        ]
    }

    /// Generate an ordered list of distinct integer keys.
    pub fn arb_distinct_keys(max_len: usize) -> impl Strategy<Value = Vec<ElementKey>> {
        proptest::collection::btree_set(any::<i64>(), 0..=max_len)
            .prop_flat_map(|set| {
                let keys: Vec<ElementKey> = set.into_iter().map(ElementKey::Int).collect();
                Just(keys).prop_shuffle()
            })
    }

    /// Generate a valid limit/offset cursor.
    pub fn arb_offset_cursor() -> impl Strategy<Value = OffsetCursor> {
        (1usize..=10_000, 0usize..=1_000_000)
            .prop_map(|(limit, offset)| OffsetCursor::new(limit, offset))
    }

    /// Generate a valid snapshot cursor.
    pub fn arb_snapshot_cursor() -> impl Strategy<Value = SnapshotCursor> {
        (
            arb_snapshot_id(),
            proptest::option::of(arb_element_key()),
            1usize..=10_000,
        )
            .prop_map(|(id, key, page_size)| SnapshotCursor::new(id, key, page_size))
    }

    /// Generate a cursor of either shape.
    pub fn arb_cursor() -> impl Strategy<Value = Cursor> {
        prop_oneof![
            arb_offset_cursor().prop_map(Cursor::from),
            arb_snapshot_cursor().prop_map(Cursor::from),
        ]
    }

    /// Generate a valid pagination config.
    pub fn arb_pagination_config() -> impl Strategy<Value = PaginationConfig> {
        (1usize..=20)
            .prop_flat_map(|max| (1usize..=max, Just(max)))
            .prop_map(|(default, max)| PaginationConfig::new(default, max))
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common pagination scenarios.

    use super::*;

    /// The five-element collection `a..e` used by the walk scenarios.
    pub fn alphabet() -> InMemoryCollection {
        InMemoryCollection::from_names(&["a", "b", "c", "d", "e"])
    }

    /// Config with a page size of 2 and a generous maximum.
    pub fn pairs_config() -> PaginationConfig {
        PaginationConfig::new(2, 50)
    }

    /// Store a snapshot of `keys` backdated by `age`.
    pub fn insert_aged(
        store: &InMemorySnapshotStore,
        keys: Vec<ElementKey>,
        age: chrono::Duration,
    ) -> FolioResult<SnapshotId> {
        store.insert_at(keys, chrono::Utc::now() - age)
    }

    /// A token that decodes as base64 but carries no valid cursor.
    pub fn forged_token() -> String {
        "eyJ2IjoxLCJjIjp7ImxvIjp7ImwiOjAsIm8iOjB9fX0".to_string()
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for FOLIO error variants.

    use super::*;

    /// Assert that a result is an InvalidCursor error.
    #[track_caller]
    pub fn assert_invalid_cursor<T: std::fmt::Debug>(result: &FolioResult<T>) {
        match result {
            Err(FolioError::InvalidCursor(_)) => {}
            other => panic!("Expected InvalidCursor error, got: {:?}", other),
        }
    }

    /// Assert that a result rejects a cursor of the wrong shape.
    #[track_caller]
    pub fn assert_shape_mismatch<T: std::fmt::Debug>(result: &FolioResult<T>) {
        match result {
            Err(FolioError::InvalidCursor(CursorError::ShapeMismatch { .. })) => {}
            other => panic!("Expected ShapeMismatch error, got: {:?}", other),
        }
    }

    /// Assert that a result is a Source error.
    #[track_caller]
    pub fn assert_source_error<T: std::fmt::Debug>(result: &FolioResult<T>) {
        match result {
            Err(FolioError::Source(_)) => {}
            other => panic!("Expected Source error, got: {:?}", other),
        }
    }

    /// Assert that a result is a Storage error.
    #[track_caller]
    pub fn assert_storage_error<T: std::fmt::Debug>(result: &FolioResult<T>) {
        match result {
            Err(FolioError::Storage(_)) => {}
            other => panic!("Expected Storage error, got: {:?}", other),
        }
    }

    /// Assert that a list has no duplicates.
    #[track_caller]
    pub fn assert_no_duplicates<T: std::fmt::Debug + Eq + std::hash::Hash>(items: &[T]) {
        let mut seen = std::collections::HashSet::new();
        for item in items {
            assert!(seen.insert(item), "Duplicate item: {:?}", item);
        }
    }
}
