//! Fixed in-memory source for unit tests.

use async_trait::async_trait;
use folio_core::{ElementKey, FolioResult};

use crate::source::{KeyedSource, OffsetSource};

/// A list of names keyed by themselves.
#[derive(Debug, Clone)]
pub struct Names(Vec<&'static str>);

impl Names {
    pub fn new(names: &[&'static str]) -> Self {
        Self(names.to_vec())
    }
}

#[async_trait]
impl KeyedSource for Names {
    type Element = &'static str;

    async fn materialize_order(&self) -> FolioResult<Vec<ElementKey>> {
        Ok(self.0.iter().map(|n| ElementKey::from(*n)).collect())
    }

    async fn resolve(&self, keys: &[ElementKey]) -> FolioResult<Vec<&'static str>> {
        Ok(keys
            .iter()
            .filter_map(|k| self.0.iter().find(|n| ElementKey::from(**n) == *k).copied())
            .collect())
    }
}

#[async_trait]
impl OffsetSource for Names {
    type Element = &'static str;

    async fn fetch(&self, offset: usize, limit: usize) -> FolioResult<Vec<&'static str>> {
        Ok(self.0.iter().skip(offset).take(limit).copied().collect())
    }
}
