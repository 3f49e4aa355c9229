//! LMDB-backed snapshot store.
//!
//! Uses the heed crate (Rust bindings for LMDB) so snapshots survive process
//! restarts and can be shared by every worker that maps the same directory.
//!
//! # Record Format
//!
//! - Key: the 16 raw bytes of the snapshot's UUIDv7 id
//! - Value: `[created_at millis: 8 bytes LE][JSON array of element keys]`
//!
//! # Atomicity
//!
//! `create` writes the whole record in one write transaction, so readers
//! see either the complete key list or nothing. A sweep collects expired
//! ids under a read transaction and deletes them in a single write
//! transaction.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{ElementKey, FolioResult, Snapshot, SnapshotId, StorageError, Timestamp};
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::traits::SnapshotStore;

/// Error type for LMDB store operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStoreError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert LmdbStoreError to FolioError.
impl From<LmdbStoreError> for folio_core::FolioError {
    fn from(e: LmdbStoreError) -> Self {
        match e {
            LmdbStoreError::Serialization(reason) | LmdbStoreError::Deserialization(reason) => {
                folio_core::FolioError::Storage(StorageError::Serialization { reason })
            }
            other => folio_core::FolioError::Storage(StorageError::TransactionFailed {
                reason: other.to_string(),
            }),
        }
    }
}

const TIMESTAMP_LEN: usize = 8;

/// LMDB-backed snapshot store.
///
/// # Example
///
/// ```ignore
/// use folio_storage::{LmdbSnapshotStore, SnapshotStore};
///
/// let store = LmdbSnapshotStore::new("/var/lib/folio/snapshots", 256)?;
/// let id = store.create(keys).await?;
/// let snapshot = store.get(id).await?;
/// ```
pub struct LmdbSnapshotStore {
    /// The LMDB environment.
    env: Env,
    /// The snapshot database (single unnamed database).
    db: Database<Bytes, Bytes>,
}

impl LmdbSnapshotStore {
    /// Open (or create) an LMDB snapshot store.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - LMDB environment cannot be opened
    /// - Database cannot be created
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbStoreError> {
        std::fs::create_dir_all(&path)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbStoreError::EnvOpen(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbStoreError::DbOpen(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        Ok(Self { env, db })
    }

    fn encode_record(keys: &[ElementKey], created_at: Timestamp) -> Result<Vec<u8>, LmdbStoreError> {
        let keys_json =
            serde_json::to_vec(keys).map_err(|e| LmdbStoreError::Serialization(e.to_string()))?;

        let mut bytes = Vec::with_capacity(TIMESTAMP_LEN + keys_json.len());
        bytes.extend_from_slice(&created_at.timestamp_millis().to_le_bytes());
        bytes.extend_from_slice(&keys_json);
        Ok(bytes)
    }

    fn decode_created_at(bytes: &[u8]) -> Result<Timestamp, LmdbStoreError> {
        let timestamp_bytes: [u8; TIMESTAMP_LEN] = bytes
            .get(0..TIMESTAMP_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| LmdbStoreError::Deserialization("record shorter than timestamp".into()))?;
        let millis = i64::from_le_bytes(timestamp_bytes);
        DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| LmdbStoreError::Deserialization(format!("invalid timestamp {}", millis)))
    }

    fn decode_record(id: SnapshotId, bytes: &[u8]) -> Result<Snapshot, LmdbStoreError> {
        let created_at = Self::decode_created_at(bytes)?;
        let keys: Vec<ElementKey> = serde_json::from_slice(&bytes[TIMESTAMP_LEN..])
            .map_err(|e| LmdbStoreError::Deserialization(e.to_string()))?;
        Ok(Snapshot::new(id, keys, created_at))
    }

    /// Collect ids of records created before `cutoff`.
    ///
    /// Records whose header cannot be parsed are collected too; they can
    /// never be served and would otherwise leak forever.
    fn collect_expired(&self, cutoff: Timestamp) -> Result<Vec<Vec<u8>>, LmdbStoreError> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let iter = self
            .db
            .iter(&rtxn)
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let mut expired = Vec::new();
        for result in iter {
            let (key, value) = result.map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
            match Self::decode_created_at(value) {
                Ok(created_at) if created_at >= cutoff => {}
                Ok(_) => expired.push(key.to_vec()),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping unreadable snapshot record");
                    expired.push(key.to_vec());
                }
            }
        }

        Ok(expired)
    }
}

#[async_trait]
impl SnapshotStore for LmdbSnapshotStore {
    async fn create(&self, ordered_keys: Vec<ElementKey>) -> FolioResult<SnapshotId> {
        let id = SnapshotId::now_v7();
        let record = Self::encode_record(&ordered_keys, Utc::now())?;

        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let inserted = self
            .db
            .get(&wtxn, id.as_bytes())
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?
            .is_none();
        if !inserted {
            return Err(StorageError::InsertFailed {
                reason: format!("snapshot {} already exists", id),
            }
            .into());
        }

        self.db
            .put(&mut wtxn, id.as_bytes(), &record)
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        Ok(id)
    }

    async fn get(&self, id: SnapshotId) -> FolioResult<Option<Snapshot>> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        match self.db.get(&rtxn, id.as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(Self::decode_record(id, bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(LmdbStoreError::Transaction(e.to_string()).into()),
        }
    }

    async fn delete_created_before(&self, cutoff: Timestamp) -> FolioResult<u64> {
        let expired = self.collect_expired(cutoff)?;
        if expired.is_empty() {
            return Ok(0);
        }

        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let mut deleted = 0u64;
        for key in &expired {
            if self
                .db
                .delete(&mut wtxn, key)
                .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?
            {
                deleted += 1;
            }
        }

        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        Ok(deleted)
    }

    async fn count(&self) -> FolioResult<u64> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        Ok(self
            .db
            .len(&rtxn)
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?)
    }
}

impl std::fmt::Debug for LmdbSnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmdbSnapshotStore")
            .field("path", &self.env.path())
            .finish()
    }
}
