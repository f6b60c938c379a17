//! Strategy query coordination
//!
//! Turns filter changes into at most one outstanding strategy request,
//! serving fresh results from the session cache and discarding responses
//! that belong to superseded cycles.

pub mod cache;
pub mod filters;
pub mod query;
pub mod state;

pub use cache::{CacheEntry, CacheKey, StrategyCache};
pub use filters::{normalize_token, FilterAction, FilterState};
pub use query::StrategyCoordinator;
pub use state::{CycleOutcome, QuerySnapshot, QueryStatus};
