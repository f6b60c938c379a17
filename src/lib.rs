//! StrategyScout Library
//!
//! Client-side query coordination for a DeFi yield-strategy API: filter
//! state, a session cache of strategy responses, cancellable requests and
//! the derived views shown to the user.

pub mod api;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod view;

// Re-export commonly used types
pub use api::rest::StrategyApiClient;
pub use common::cancel::{cancel_pair, CancelHandle, CancelToken};
pub use common::errors::{ClientError, Result};
pub use common::traits::{SharedTransport, StrategyTransport};
pub use common::types::{
    ApiResponse, Preferences, RiskLevel, Statistics, Strategy, StrategyBundle, StrategyLinks,
    StrategyRequest,
};
pub use config::types::AppConfig;

// Coordinator types
pub use coordinator::{
    CacheEntry, CacheKey, CycleOutcome, FilterAction, FilterState, QuerySnapshot, QueryStatus,
    StrategyCache, StrategyCoordinator,
};
pub use view::{derive_view, GrowthFilter, SortOption, StrategyView, ViewOptions};
