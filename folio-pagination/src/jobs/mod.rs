//! Background Jobs
//!
//! - `snapshot_sweeper`: deletes pagination snapshots past their TTL
//!
//! # Usage
//!
//! The sweeper is typically spawned next to the server that owns the store:
//!
//! ```ignore
//! use folio_pagination::jobs::snapshot_sweeper_task;
//! use tokio::sync::watch;
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! tokio::spawn(snapshot_sweeper_task(Arc::clone(&store), SweeperConfig::default(), shutdown_rx));
//!
//! // On shutdown
//! let _ = shutdown_tx.send(true);
//! ```

pub mod snapshot_sweeper;

pub use snapshot_sweeper::{snapshot_sweeper_task, sweep_once, SweeperMetrics, SweeperSnapshot};
