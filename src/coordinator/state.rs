use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::cache::CacheKey;
use crate::common::types::ApiResponse;

/// Lifecycle of the published query state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// No token selected; nothing fetched
    Idle,
    /// First fetch for this key, nothing to show yet
    Loading,
    /// Showing a stale cached response while it is re-fetched
    Refreshing,
    /// Showing a successful response
    Ready,
    /// The backend found no strategies
    Empty,
    /// Last cycle failed; `error` holds the message
    Error,
}

/// State published to subscribers after every change
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    /// Key the snapshot belongs to
    pub cache_key: Option<CacheKey>,
    /// Data currently shown (kept on error)
    pub data: Option<Arc<ApiResponse>>,
    pub error: Option<String>,
    /// True when `data` came from the cache without a request
    pub from_cache: bool,
    pub updated_at: Option<DateTime<Utc>>,
    /// Cycle that produced this snapshot
    pub generation: u64,
}

impl QuerySnapshot {
    pub fn idle(generation: u64) -> Self {
        Self {
            status: QueryStatus::Idle,
            cache_key: None,
            data: None,
            error: None,
            from_cache: false,
            updated_at: None,
            generation,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Loading | QueryStatus::Refreshing)
    }
}

impl Default for QuerySnapshot {
    fn default() -> Self {
        Self::idle(0)
    }
}

/// How a single evaluation cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Empty token; state reset to idle
    Idle,
    /// Served a fresh cache entry without a request
    CacheHit,
    /// Request completed and the result was published
    Fetched(QueryStatus),
    /// Request failed; the message was published
    Failed(String),
    /// A newer cycle started first; nothing was published
    Superseded,
}
