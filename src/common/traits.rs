//! Trait definitions for strategy transports

use async_trait::async_trait;
use std::sync::Arc;

use super::cancel::CancelToken;
use super::errors::Result;
use super::types::{ApiResponse, StrategyRequest};

/// Transport used by the query coordinator to reach the strategy API
///
/// Implementations must observe `cancel` and return
/// [`ClientError::Cancelled`](super::errors::ClientError::Cancelled) once it fires,
/// abandoning the underlying request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StrategyTransport: Send + Sync {
    /// Fetch strategies for a single filter combination
    async fn fetch_strategies(
        &self,
        request: &StrategyRequest,
        cancel: CancelToken,
    ) -> Result<ApiResponse>;
}

/// Type alias for a shared, dynamically dispatched transport
pub type SharedTransport = Arc<dyn StrategyTransport>;
