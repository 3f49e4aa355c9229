//! FOLIO Pagination - Paginators and Snapshot Sweeper
//!
//! Two paginators share one request/response vocabulary:
//!
//! - [`LimitOffsetCursorPaginator`] wraps limit/offset in an opaque cursor.
//!   Stateless, and only as stable as the source's ordering.
//! - [`SnapshotPaginator`] freezes the ordered key sequence on the first
//!   page and walks that snapshot afterwards, so re-sorts and inserts never
//!   shift a walk.
//!
//! Data access goes through [`KeyedSource`] and [`OffsetSource`]. Expired
//! snapshots are removed by the sweeper in [`jobs`].

pub mod jobs;
pub mod limit_offset;
pub mod page;
pub mod request;
pub mod snapshot;
pub mod source;

#[cfg(test)]
mod testing;

pub use jobs::{snapshot_sweeper_task, sweep_once, SweeperMetrics, SweeperSnapshot};
pub use limit_offset::{LimitOffsetCursorPaginator, OffsetWindow};
pub use page::{replace_query_param, Page};
pub use request::PageRequest;
pub use snapshot::SnapshotPaginator;
pub use source::{order_by_keys, KeyedSource, OffsetSource};
