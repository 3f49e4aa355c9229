//! Backing-store traits consumed by the paginators.
//!
//! The paginators never see filters, search terms, or ordering rules. An
//! implementing value captures that query context and answers in keys and
//! elements only.

use std::collections::HashMap;

use async_trait::async_trait;
use folio_core::{ElementKey, FolioResult};

/// A data source the snapshot paginator can freeze and resolve.
#[async_trait]
pub trait KeyedSource: Send + Sync {
    /// Element type handed back to callers.
    type Element: Send;

    /// Run the underlying query and return the full ordered key sequence.
    async fn materialize_order(&self) -> FolioResult<Vec<ElementKey>>;

    /// Fetch the live elements for `keys`, in the same order.
    ///
    /// Keys that no longer exist are skipped; this is not an error.
    async fn resolve(&self, keys: &[ElementKey]) -> FolioResult<Vec<Self::Element>>;
}

/// A data source the limit/offset paginator can window into.
#[async_trait]
pub trait OffsetSource: Send + Sync {
    /// Element type handed back to callers.
    type Element: Send;

    /// Fetch up to `limit` elements starting at `offset` in the current order.
    async fn fetch(&self, offset: usize, limit: usize) -> FolioResult<Vec<Self::Element>>;
}

/// Arrange the results of a keyed multi-get in the order of `keys`.
///
/// Most stores answer "fetch by primary key in (...)" in arbitrary order.
/// Keys missing from `found` are dropped; duplicate keys yield the element
/// once, at the first position.
pub fn order_by_keys<T>(keys: &[ElementKey], mut found: HashMap<ElementKey, T>) -> Vec<T> {
    keys.iter().filter_map(|key| found.remove(key)).collect()
}
