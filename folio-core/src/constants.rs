//! Constants for FOLIO
//!
//! Centralized defaults for pagination, snapshot retention, and cursor
//! decoding limits.

// ============================================================================
// PAGINATION
// ============================================================================

/// Default page size when the client does not request one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum page size a client may request
pub const DEFAULT_MAX_PAGE_SIZE: usize = 50;

/// Query parameter carrying the opaque cursor
pub const CURSOR_QUERY_PARAM: &str = "cursor";

/// Query parameter carrying the requested page size (first page only)
pub const PAGE_SIZE_QUERY_PARAM: &str = "page_size";

// ============================================================================
// SNAPSHOTS
// ============================================================================

/// Default snapshot time-to-live in seconds (1 hour)
pub const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 3600;

/// Default interval between snapshot sweeps in seconds (5 minutes)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

// ============================================================================
// CURSORS
// ============================================================================

/// Current cursor envelope version
pub const CURSOR_VERSION: u8 = 1;

/// Upper bound on accepted cursor token length (untrusted input)
pub const MAX_CURSOR_TOKEN_LEN: usize = 8 * 1024;
