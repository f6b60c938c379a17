//! Strategy query coordinator

use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use super::cache::{CacheKey, StrategyCache};
use super::filters::{normalize_token, FilterAction, FilterState};
use super::state::{CycleOutcome, QuerySnapshot, QueryStatus};
use crate::api::rest::StrategyApiClient;
use crate::common::cancel::{cancel_pair, CancelHandle, CancelToken};
use crate::common::errors::Result;
use crate::common::traits::SharedTransport;
use crate::common::types::{ApiResponse, Preferences, StrategyRequest};
use crate::config::types::{AppConfig, CoordinatorSettings};
use crate::view::{derive_view, StrategyView};

/// Request currently owned by the coordinator
#[derive(Debug)]
struct InFlight {
    generation: u64,
    key: CacheKey,
    handle: CancelHandle,
}

/// Coordinates filter changes, the response cache and strategy requests
///
/// Every evaluation is a *cycle* numbered by a monotonically increasing
/// generation. Starting a cycle cancels the request of the previous one,
/// and a cycle only commits its result (cache write + published state)
/// while it is still the newest. Published state therefore always belongs
/// to the most recently started cycle, whatever order responses arrive in.
///
/// The coordinator is `Send + Sync`; share it behind an `Arc` and drive
/// overlapping cycles from separate tasks.
pub struct StrategyCoordinator {
    transport: SharedTransport,
    cache: StrategyCache,
    settings: CoordinatorSettings,
    filters: Mutex<FilterState>,
    generation: AtomicU64,
    /// Set by an explicit submit; skips the freshness check once
    bypass: AtomicBool,
    in_flight: Mutex<Option<InFlight>>,
    state_tx: watch::Sender<QuerySnapshot>,
}

impl StrategyCoordinator {
    /// Create a coordinator with an empty cache and default filters
    pub fn new(transport: SharedTransport, settings: CoordinatorSettings) -> Self {
        Self::with_cache(transport, settings, StrategyCache::new())
    }

    /// Create a coordinator sharing an existing cache
    pub fn with_cache(
        transport: SharedTransport,
        settings: CoordinatorSettings,
        cache: StrategyCache,
    ) -> Self {
        let (state_tx, _) = watch::channel(QuerySnapshot::default());
        Self {
            transport,
            cache,
            settings,
            filters: Mutex::new(FilterState::default()),
            generation: AtomicU64::new(0),
            bypass: AtomicBool::new(false),
            in_flight: Mutex::new(None),
            state_tx,
        }
    }

    /// Build a coordinator talking HTTP to the configured API
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = StrategyApiClient::from_config(&config.api)?;
        Ok(Self::new(Arc::new(client), config.coordinator.clone()))
    }

    /// Replace the initial filters; the token is normalized
    pub fn with_filters(mut self, mut filters: FilterState) -> Self {
        filters.token = normalize_token(&filters.token);
        self.filters = Mutex::new(filters);
        self
    }

    pub fn cache(&self) -> &StrategyCache {
        &self.cache
    }

    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Receiver notified on every published state change
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        self.state_tx.borrow().clone()
    }

    pub async fn filters(&self) -> FilterState {
        self.filters.lock().await.clone()
    }

    /// Generation of the most recently started cycle
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn has_pending_bypass(&self) -> bool {
        self.bypass.load(Ordering::SeqCst)
    }

    /// Apply a filter action; runs a cycle when the action requests a fetch
    ///
    /// Returns `None` for view-only changes (sort, growth, only-new,
    /// only-top), which never touch the network.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, action: FilterAction) -> Option<CycleOutcome> {
        let key = {
            let mut filters = self.filters.lock().await;
            if !filters.apply(action) {
                return None;
            }
            filters.cache_key()
        };
        Some(self.run_cycle(key).await)
    }

    /// Explicit user submit: fetch even if a fresh entry is cached
    pub async fn submit(&self) -> CycleOutcome {
        self.bypass.store(true, Ordering::SeqCst);
        let key = {
            let mut filters = self.filters.lock().await;
            filters.apply(FilterAction::TriggerFetch);
            filters.cache_key()
        };
        self.run_cycle(key).await
    }

    /// Run a cycle for the current filters
    pub async fn evaluate(&self) -> CycleOutcome {
        let key = self.filters.lock().await.cache_key();
        self.run_cycle(key).await
    }

    /// Views of the currently shown data under the current filters
    pub async fn view(&self) -> Option<StrategyView> {
        let options = self.filters.lock().await.view_options();
        let data = self.state_tx.borrow().data.clone()?;
        Some(derive_view(&data, &options))
    }

    /// Clear the error message, keeping the data on screen
    pub fn dismiss_error(&self) {
        self.state_tx.send_if_modified(|snapshot| {
            if snapshot.error.is_none() {
                return false;
            }
            snapshot.error = None;
            if snapshot.status == QueryStatus::Error {
                snapshot.status = match snapshot.data.as_deref() {
                    Some(data) => status_for(data),
                    None => QueryStatus::Idle,
                };
            }
            true
        });
    }

    /// Cancel the current request and ignore its eventual result
    pub async fn cancel_in_flight(&self) {
        let mut slot = self.in_flight.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(in_flight) = slot.take() {
            debug!(generation = in_flight.generation, key = %in_flight.key, "Cancelling request on teardown");
            in_flight.handle.cancel();
        }
    }

    // ========================================================================
    // Cycle
    // ========================================================================

    #[instrument(skip(self, key), fields(key = %key))]
    async fn run_cycle(&self, key: CacheKey) -> CycleOutcome {
        let generation = self.begin_cycle().await;

        if key.is_idle() {
            debug!(generation, "No token selected, resetting to idle");
            if !self.publish_if_current(generation, QuerySnapshot::idle(generation)) {
                return CycleOutcome::Superseded;
            }
            // An idle cycle still completes a pending submit.
            self.bypass.store(false, Ordering::SeqCst);
            return CycleOutcome::Idle;
        }

        let bypass = self.bypass.load(Ordering::SeqCst);
        let now = Utc::now();
        let cached = self.cache.get(&key).await;

        if let Some(entry) = cached
            .as_ref()
            .filter(|entry| !bypass && entry.is_fresh(now, self.settings.cache_ttl()))
        {
            debug!(generation, age_secs = entry.age(now).num_seconds(), "Serving strategies from cache");
            let snapshot = QuerySnapshot {
                status: QueryStatus::Ready,
                cache_key: Some(key),
                data: Some(entry.data.clone()),
                error: None,
                from_cache: true,
                updated_at: Some(entry.updated_at),
                generation,
            };
            return if self.publish_if_current(generation, snapshot) {
                CycleOutcome::CacheHit
            } else {
                CycleOutcome::Superseded
            };
        }

        let (handle, token) = cancel_pair();
        {
            let mut slot = self.in_flight.lock().await;
            if !self.is_current(generation) {
                return CycleOutcome::Superseded;
            }
            *slot = Some(InFlight {
                generation,
                key: key.clone(),
                handle,
            });
        }

        let shown = cached
            .as_ref()
            .filter(|entry| !matches!(entry.data.as_ref(), ApiResponse::Error { .. }));
        let pending = match shown {
            Some(entry) => QuerySnapshot {
                status: QueryStatus::Refreshing,
                cache_key: Some(key.clone()),
                data: Some(entry.data.clone()),
                error: None,
                from_cache: true,
                updated_at: Some(entry.updated_at),
                generation,
            },
            None => QuerySnapshot {
                status: QueryStatus::Loading,
                cache_key: Some(key.clone()),
                ..QuerySnapshot::idle(generation)
            },
        };
        self.publish_if_current(generation, pending);

        let request = self.build_request(&key, bypass);
        info!(generation, force_refresh = bypass, "Fetching strategies");
        let result = self.transport.fetch_strategies(&request, token.clone()).await;

        self.complete(generation, key, &token, result, bypass).await
    }

    /// Allocate a generation and cancel whatever request is still running
    async fn begin_cycle(&self) -> u64 {
        let mut slot = self.in_flight.lock().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = slot.take() {
            debug!(
                previous = previous.generation,
                key = %previous.key,
                "Cancelling superseded strategy request"
            );
            previous.handle.cancel();
        }
        generation
    }

    async fn complete(
        &self,
        generation: u64,
        key: CacheKey,
        token: &CancelToken,
        result: Result<ApiResponse>,
        bypass: bool,
    ) -> CycleOutcome {
        if matches!(&result, Err(err) if err.is_cancelled()) {
            return CycleOutcome::Superseded;
        }

        // Holding the slot keeps new cycles from starting until we commit.
        let mut slot = self.in_flight.lock().await;
        if !self.is_current(generation) || token.is_cancelled() {
            debug!(generation, "Discarding result of superseded cycle");
            return CycleOutcome::Superseded;
        }
        if slot.as_ref().is_some_and(|f| f.generation == generation) {
            *slot = None;
        }
        if bypass {
            self.bypass.store(false, Ordering::SeqCst);
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                let message = err.user_message();
                warn!(generation, error = %err, "Strategy request failed");
                self.publish_error(generation, message.clone());
                return CycleOutcome::Failed(message);
            }
        };

        // Error payloads are cached too; only ok entries ever count as fresh.
        let status = status_for(&response);
        let entry = self.cache.insert(key.clone(), Arc::new(response)).await;

        if let ApiResponse::Error { message } = entry.data.as_ref() {
            let message = if message.trim().is_empty() {
                "The strategy service reported an error".to_string()
            } else {
                message.clone()
            };
            warn!(generation, %message, "Strategy service returned an error payload");
            self.publish_error(generation, message.clone());
            return CycleOutcome::Failed(message);
        }

        info!(generation, ?status, "Strategies updated");

        self.state_tx.send_replace(QuerySnapshot {
            status,
            cache_key: Some(key),
            data: Some(entry.data),
            error: None,
            from_cache: false,
            updated_at: Some(entry.updated_at),
            generation,
        });
        CycleOutcome::Fetched(status)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Publish unless a newer cycle has started; returns whether it did
    fn publish_if_current(&self, generation: u64, snapshot: QuerySnapshot) -> bool {
        self.state_tx.send_if_modified(|current| {
            if !self.is_current(generation) {
                return false;
            }
            *current = snapshot;
            true
        })
    }

    /// Surface an error while keeping whatever data is on screen
    fn publish_error(&self, generation: u64, message: String) {
        self.state_tx.send_modify(|snapshot| {
            snapshot.status = QueryStatus::Error;
            snapshot.error = Some(message);
            snapshot.generation = generation;
        });
    }

    fn build_request(&self, key: &CacheKey, force_refresh: bool) -> StrategyRequest {
        StrategyRequest {
            token: key.token().to_string(),
            preferences: Preferences {
                risk_level: key.risk_level(),
                include_wrappers: key.include_wrappers(),
                min_tvl: self.settings.min_tvl_usd,
            },
            result_limit: self.settings.result_limit,
            force_refresh,
        }
    }
}

fn status_for(response: &ApiResponse) -> QueryStatus {
    match response {
        ApiResponse::Ok(_) => QueryStatus::Ready,
        ApiResponse::Empty { .. } => QueryStatus::Empty,
        ApiResponse::Error { .. } => QueryStatus::Error,
    }
}
