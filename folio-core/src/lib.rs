//! FOLIO Core - Cursor, Snapshot, and Error Types
//!
//! Shared vocabulary for the stable pagination engine: the two cursor
//! shapes and their opaque token codec, the immutable snapshot value, the
//! error taxonomy, and configuration. Storage and paging logic live in
//! `folio-storage` and `folio-pagination`.

pub mod codec;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod identity;
pub mod snapshot;

pub use codec::CursorCodec;
pub use config::{PaginationConfig, SweeperConfig};
pub use cursor::{Cursor, OffsetCursor, SnapshotCursor};
pub use error::{
    ConfigError, CursorError, ErrorCode, FolioError, FolioResult, SourceError, StorageError,
};
pub use identity::{ElementKey, SnapshotId, Timestamp};
pub use snapshot::Snapshot;
