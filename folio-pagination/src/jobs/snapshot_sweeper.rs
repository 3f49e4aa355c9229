//! Snapshot Sweeper Background Task
//!
//! Snapshots are only useful while a client is still walking them. This
//! task periodically deletes every snapshot older than the configured TTL.
//!
//! A walk whose snapshot is swept mid-way is not broken: the snapshot
//! paginator re-baselines it on the next request. Sweeping is therefore
//! safe to run concurrently with any number of readers.
//!
//! # Configuration
//!
//! ```rust
//! use folio_core::SweeperConfig;
//! use std::time::Duration;
//!
//! let config = SweeperConfig::default()
//!     .with_interval(Duration::from_secs(60))   // sweep every minute
//!     .with_ttl(Duration::from_secs(30 * 60));  // keep walks for 30 minutes
//! assert!(config.validate().is_ok());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use folio_core::SweeperConfig;
use folio_storage::SnapshotStore;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

// ============================================================================
// METRICS
// ============================================================================

/// Counters for sweeper activity.
#[derive(Debug, Default)]
pub struct SweeperMetrics {
    /// Total snapshots deleted since startup
    pub snapshots_deleted: AtomicU64,

    /// Total sweep passes completed (including failed ones)
    pub sweep_cycles: AtomicU64,

    /// Total sweep passes that returned an error
    pub sweep_errors: AtomicU64,
}

impl SweeperMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current snapshot of all metrics.
    pub fn snapshot(&self) -> SweeperSnapshot {
        SweeperSnapshot {
            snapshots_deleted: self.snapshots_deleted.load(Ordering::Relaxed),
            sweep_cycles: self.sweep_cycles.load(Ordering::Relaxed),
            sweep_errors: self.sweep_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SweeperMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperSnapshot {
    pub snapshots_deleted: u64,
    pub sweep_cycles: u64,
    pub sweep_errors: u64,
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Background task that periodically deletes expired snapshots.
///
/// Runs until `shutdown_rx` observes `true` (or its sender is dropped) and
/// returns the metrics collected over its lifetime. The first sweep runs
/// immediately. An invalid config is logged and the task returns without
/// sweeping.
///
/// # Example
///
/// ```ignore
/// use tokio::sync::watch;
///
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = tokio::spawn(snapshot_sweeper_task(store, SweeperConfig::from_env(), shutdown_rx));
///
/// // On shutdown
/// let _ = shutdown_tx.send(true);
/// let metrics = handle.await?;
/// ```
pub async fn snapshot_sweeper_task(
    store: Arc<dyn SnapshotStore>,
    config: SweeperConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<SweeperMetrics> {
    let metrics = Arc::new(SweeperMetrics::new());

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Snapshot sweeper not started: invalid config");
        return metrics;
    }

    let mut sweep_interval = interval(config.interval);
    sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        ttl_secs = config.ttl.as_secs(),
        "Snapshot sweeper started"
    );

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    tracing::info!("Snapshot sweeper shutting down");
                    break;
                }
            }

            _ = sweep_interval.tick() => {
                let deleted = sweep_once(store.as_ref(), config.ttl, &metrics).await;
                if deleted > 0 && config.log_sweeps {
                    tracing::info!(deleted, "Swept expired snapshots");
                } else {
                    tracing::trace!(deleted, "Snapshot sweep completed");
                }
            }
        }
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        snapshots_deleted = snapshot.snapshots_deleted,
        sweep_cycles = snapshot.sweep_cycles,
        sweep_errors = snapshot.sweep_errors,
        "Snapshot sweeper completed"
    );

    metrics
}

/// Run a single sweep pass.
///
/// Returns the number of snapshots deleted. Failures are logged and
/// counted, never propagated; the next tick simply tries again.
pub async fn sweep_once<S>(store: &S, ttl: Duration, metrics: &SweeperMetrics) -> u64
where
    S: SnapshotStore + ?Sized,
{
    metrics.sweep_cycles.fetch_add(1, Ordering::Relaxed);

    match store.delete_older_than(ttl).await {
        Ok(deleted) => {
            metrics
                .snapshots_deleted
                .fetch_add(deleted, Ordering::Relaxed);
            deleted
        }
        Err(e) => {
            tracing::error!(error = %e, ttl_secs = ttl.as_secs(), "Snapshot sweep failed");
            metrics.sweep_errors.fetch_add(1, Ordering::Relaxed);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use folio_core::{
        ElementKey, FolioResult, Snapshot, SnapshotId, StorageError, Timestamp,
    };
    use folio_storage::InMemorySnapshotStore;

    /// Store whose deletes always fail.
    struct BrokenStore;

    #[async_trait]
    impl SnapshotStore for BrokenStore {
        async fn create(&self, _keys: Vec<ElementKey>) -> FolioResult<SnapshotId> {
            Err(StorageError::LockPoisoned.into())
        }

        async fn get(&self, _id: SnapshotId) -> FolioResult<Option<Snapshot>> {
            Ok(None)
        }

        async fn delete_created_before(&self, _cutoff: Timestamp) -> FolioResult<u64> {
            Err(StorageError::TransactionFailed {
                reason: "disk gone".to_string(),
            }
            .into())
        }

        async fn count(&self) -> FolioResult<u64> {
            Ok(0)
        }
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = SweeperMetrics::new();
        metrics.snapshots_deleted.fetch_add(4, Ordering::Relaxed);
        metrics.sweep_cycles.fetch_add(2, Ordering::Relaxed);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.snapshots_deleted, 4);
        assert_eq!(snapshot.sweep_cycles, 2);
        assert_eq!(snapshot.sweep_errors, 0);
    }

    #[tokio::test]
    async fn test_sweep_once_deletes_only_expired() {
        let store = InMemorySnapshotStore::new();
        store
            .insert_at(vec![ElementKey::Int(1)], Utc::now() - chrono::Duration::hours(2))
            .unwrap();
        store.create(vec![ElementKey::Int(2)]).await.unwrap();
        let metrics = SweeperMetrics::new();

        let deleted = sweep_once(&store, Duration::from_secs(3600), &metrics).await;

        assert_eq!(deleted, 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(metrics.snapshot().snapshots_deleted, 1);
        assert_eq!(metrics.snapshot().sweep_cycles, 1);
    }

    #[tokio::test]
    async fn test_sweep_once_counts_errors() {
        let metrics = SweeperMetrics::new();

        let deleted = sweep_once(&BrokenStore, Duration::from_secs(60), &metrics).await;

        assert_eq!(deleted, 0);
        assert_eq!(metrics.snapshot().sweep_errors, 1);
        assert_eq!(metrics.snapshot().sweep_cycles, 1);
    }

    #[tokio::test]
    async fn test_task_stops_on_shutdown() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store
            .insert_at(vec![ElementKey::Int(1)], Utc::now() - chrono::Duration::hours(2))
            .unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let config = SweeperConfig::default().with_interval(Duration::from_millis(10));
        let handle = tokio::spawn(snapshot_sweeper_task(store.clone(), config, shutdown_rx));

        // First tick fires immediately; give it a moment to run.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        let metrics = handle.await.unwrap();
        assert!(metrics.snapshot().sweep_cycles >= 1);
        assert_eq!(metrics.snapshot().snapshots_deleted, 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_task_stops_when_sender_dropped() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(snapshot_sweeper_task(
            store,
            SweeperConfig::default(),
            shutdown_rx,
        ));

        drop(shutdown_tx);

        let metrics = handle.await.unwrap();
        assert_eq!(metrics.snapshot().sweep_errors, 0);
    }

    #[tokio::test]
    async fn test_broken_store_is_not_fatal() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let config = SweeperConfig::default().with_interval(Duration::from_millis(5));
        let handle = tokio::spawn(snapshot_sweeper_task(Arc::new(BrokenStore), config, shutdown_rx));

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown_tx.send(true).unwrap();

        let metrics = handle.await.unwrap();
        assert!(metrics.snapshot().sweep_errors >= 1);
        assert_eq!(
            metrics.snapshot().sweep_errors,
            metrics.snapshot().sweep_cycles
        );
    }

    #[tokio::test]
    async fn test_zero_interval_returns_without_sweeping() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store
            .insert_at(vec![ElementKey::Int(1)], Utc::now() - chrono::Duration::hours(2))
            .unwrap();

        // Sender stays alive: only the config check can end the task.
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let config = SweeperConfig::default().with_interval(Duration::ZERO);
        let handle = tokio::spawn(snapshot_sweeper_task(store.clone(), config, shutdown_rx));

        let metrics = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should return")
            .unwrap();
        assert_eq!(metrics.snapshot().sweep_cycles, 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
