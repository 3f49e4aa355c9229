//! Error types for FOLIO operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a cursor token is rejected.
///
/// Every variant is surfaced to callers as [`FolioError::InvalidCursor`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token is not valid base64: {reason}")]
    Encoding { reason: String },

    #[error("cursor payload is malformed: {reason}")]
    Payload { reason: String },

    #[error("unsupported cursor version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("expected a {expected} cursor, got a {found} cursor")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid cursor field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("cursor token is not in canonical form")]
    NonCanonical,
}

/// Snapshot storage errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Snapshot insert failed: {reason}")]
    InsertFailed { reason: String },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Snapshot serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Incompatible options: {option_a} and {option_b}")]
    IncompatibleOptions { option_a: String, option_b: String },
}

/// Errors reported by a backing store while materializing or resolving keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Backing store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Backing store query failed: {reason}")]
    QueryFailed { reason: String },
}

/// Master error type for all FOLIO errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FolioError {
    #[error("Invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Result type alias for FOLIO operations.
pub type FolioResult<T> = Result<T, FolioError>;

// ============================================================================
// ERROR CODES
// ============================================================================

/// Stable, serializable error codes for transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cursor is malformed, tampered with, or belongs to another paginator
    InvalidCursor,

    /// Snapshot storage failed
    StorageError,

    /// Paginator or sweeper misconfigured
    ConfigError,

    /// Backing store failed
    SourceError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    ///
    /// An unrecognizable cursor points at a page that does not exist, so it
    /// maps to 404 rather than 400.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCode::InvalidCursor => 404,
            ErrorCode::StorageError => 503,
            ErrorCode::ConfigError => 500,
            ErrorCode::SourceError => 503,
        }
    }
}

impl FolioError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            FolioError::InvalidCursor(_) => ErrorCode::InvalidCursor,
            FolioError::Storage(_) => ErrorCode::StorageError,
            FolioError::Config(_) => ErrorCode::ConfigError,
            FolioError::Source(_) => ErrorCode::SourceError,
        }
    }

    /// Whether the caller caused this error (and retrying won't help).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.error_code().status_code())
    }
}

// =============================================================================
// TESTS
// =============================================================================
