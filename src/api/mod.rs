//! Strategy API module - HTTP client for the strategy service

pub mod messages;
pub mod rest;

pub use messages::{AnalyticsPeriod, AnalyticsSort, NewPoolsQuery, NewPoolsResponse, TokenInfo};
pub use rest::StrategyApiClient;
