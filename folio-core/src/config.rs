//! Configuration types

use crate::constants::{
    DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_SNAPSHOT_TTL_SECS,
    DEFAULT_SWEEP_INTERVAL_SECS,
};
use crate::{ConfigError, FolioResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// PAGINATION
// ============================================================================

/// Page size policy for a paginated endpoint.
///
/// Each endpoint builds its own value and hands it to its paginator at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the client does not request one
    pub default_page_size: usize,
    /// Upper bound on any page size, requested or carried in a cursor
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    pub fn new(default_page_size: usize, max_page_size: usize) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }

    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `FOLIO_DEFAULT_PAGE_SIZE`: Default page size (default: 10)
    /// - `FOLIO_MAX_PAGE_SIZE`: Maximum page size (default: 50)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_page_size: std::env::var("FOLIO_DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_page_size),
            max_page_size: std::env::var("FOLIO_MAX_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_page_size),
        }
    }

    /// Set the default page size.
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the maximum page size.
    pub fn with_max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    /// Resolve the effective page size for a first-page request.
    ///
    /// Missing or non-positive requests fall back to the default; anything
    /// above the maximum is clamped.
    pub fn effective_page_size(&self, requested: Option<i64>) -> usize {
        let size = match requested {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => self.default_page_size,
        };
        self.clamp(size)
    }

    /// Clamp a page size into `1..=max_page_size`.
    pub fn clamp(&self, size: usize) -> usize {
        size.clamp(1, self.max_page_size.max(1))
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - default_page_size > 0
    /// - max_page_size > 0
    /// - default_page_size <= max_page_size
    pub fn validate(&self) -> FolioResult<()> {
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_page_size".to_string(),
                value: self.default_page_size.to_string(),
                reason: "default_page_size must be greater than 0".to_string(),
            }
            .into());
        }

        if self.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_page_size".to_string(),
                value: self.max_page_size.to_string(),
                reason: "max_page_size must be greater than 0".to_string(),
            }
            .into());
        }

        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::IncompatibleOptions {
                option_a: format!("default_page_size={}", self.default_page_size),
                option_b: format!("max_page_size={}", self.max_page_size),
            }
            .into());
        }

        Ok(())
    }
}

// ============================================================================
// SWEEPER
// ============================================================================

/// Configuration for the snapshot sweeper background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweeperConfig {
    /// How often to sweep (default: 5 minutes)
    pub interval: Duration,

    /// Snapshots older than this are deleted (default: 1 hour)
    pub ttl: Duration,

    /// Whether to log every sweep that deletes something (default: true)
    pub log_sweeps: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            ttl: Duration::from_secs(DEFAULT_SNAPSHOT_TTL_SECS),
            log_sweeps: true,
        }
    }
}

impl SweeperConfig {
    /// Create SweeperConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `FOLIO_SWEEP_INTERVAL_SECS`: Seconds between sweeps (default: 300)
    /// - `FOLIO_SNAPSHOT_TTL_SECS`: Snapshot time-to-live (default: 3600)
    /// - `FOLIO_SWEEP_LOG`: Whether to log sweeps (default: true)
    pub fn from_env() -> Self {
        let interval = Duration::from_secs(
            std::env::var("FOLIO_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        );

        let ttl = Duration::from_secs(
            std::env::var("FOLIO_SNAPSHOT_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SNAPSHOT_TTL_SECS),
        );

        let log_sweeps = std::env::var("FOLIO_SWEEP_LOG")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);

        Self {
            interval,
            ttl,
            log_sweeps,
        }
    }

    /// Set the sweep interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the snapshot TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enable or disable per-sweep logging.
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_sweeps = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> FolioResult<()> {
        if self.interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "interval".to_string(),
                value: format!("{:?}", self.interval),
                reason: "interval must be positive".to_string(),
            }
            .into());
        }

        if self.ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "ttl".to_string(),
                value: format!("{:?}", self.ttl),
                reason: "ttl must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
