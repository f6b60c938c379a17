//! Session cache of strategy responses keyed by filter projection

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::filters::normalize_token;
use crate::common::types::{ApiResponse, RiskLevel};

/// Normalized (token, risk level, wrappers) tuple identifying a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    token: String,
    risk_level: RiskLevel,
    include_wrappers: bool,
}

impl CacheKey {
    pub fn new(token: &str, risk_level: RiskLevel, include_wrappers: bool) -> Self {
        Self {
            token: normalize_token(token),
            risk_level,
            include_wrappers,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn include_wrappers(&self) -> bool {
        self.include_wrappers
    }

    /// No query subject: nothing should be fetched
    pub fn is_idle(&self) -> bool {
        self.token.is_empty()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wrappers = if self.include_wrappers { "with" } else { "no" };
        write!(f, "{}:{}:{}", self.token, self.risk_level, wrappers)
    }
}

/// Cached response with the time it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Arc<ApiResponse>,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.updated_at
    }

    /// Fresh entries are younger than `ttl` and hold a successful result
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.data.is_ok() && self.age(now) < ttl
    }
}

/// Shared map from [`CacheKey`] to [`CacheEntry`]
///
/// Entries are never evicted; the map lives as long as the session.
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct StrategyCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
}

impl StrategyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store `data` as of now
    pub async fn insert(&self, key: CacheKey, data: Arc<ApiResponse>) -> CacheEntry {
        self.insert_at(key, data, Utc::now()).await
    }

    /// Store `data` with an explicit timestamp
    pub async fn insert_at(
        &self,
        key: CacheKey,
        data: Arc<ApiResponse>,
        updated_at: DateTime<Utc>,
    ) -> CacheEntry {
        let entry = CacheEntry { data, updated_at };
        self.entries.write().await.insert(key, entry.clone());
        entry
    }

    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
