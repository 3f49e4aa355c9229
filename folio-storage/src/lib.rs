//! FOLIO Storage - Snapshot Store Trait and Implementations
//!
//! Defines where frozen key orderings live between requests. The in-memory
//! store serves single-process deployments and tests; the LMDB store
//! persists snapshots on disk so every worker mapping the same directory
//! sees them.

pub mod lmdb_backend;
pub mod memory;
pub mod traits;

pub use lmdb_backend::{LmdbSnapshotStore, LmdbStoreError};
pub use memory::InMemorySnapshotStore;
pub use traits::SnapshotStore;
