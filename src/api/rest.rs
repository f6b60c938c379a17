//! REST API client for the strategy service

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::messages::*;
use crate::common::cancel::CancelToken;
use crate::common::errors::{ClientError, Result};
use crate::common::traits::StrategyTransport;
use crate::common::types::{ApiResponse, StrategyRequest};
use crate::config::types::ApiConfig;

/// REST API client for the strategy service
#[derive(Debug, Clone)]
pub struct StrategyApiClient {
    /// HTTP client
    client: Client,
    /// Base URL without a trailing slash
    base_url: String,
}

impl StrategyApiClient {
    /// Create a new REST client with the default 30s timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| ClientError::Configuration(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the API section of the configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::with_timeout(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query strategies for a token
    ///
    /// HTTP 202 with `status: "empty"` is returned while the backend is
    /// still collecting data; it decodes like any other response.
    #[instrument(skip(self, request), fields(token = %request.token))]
    pub async fn post_strategies(&self, request: &StrategyRequest) -> Result<ApiResponse> {
        let url = format!("{}/strategies", self.base_url);
        debug!("Posting strategy query to: {}", url);

        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::ensure_success(response).await?;

        let body = response.text().await?;
        let parsed: ApiResponse = serde_json::from_str(&body)?;
        debug!(status = parsed.status_label(), "Strategy query answered");
        Ok(parsed)
    }

    /// Get the token list used to populate filter options
    #[instrument(skip(self))]
    pub async fn get_tokens(&self, limit: Option<u32>) -> Result<Vec<TokenInfo>> {
        let url = format!("{}/tokens", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(l) = limit {
            request = request.query(&[("limit", l)]);
        }
        debug!("Fetching tokens from: {}", url);

        let response = Self::ensure_success(request.send().await?).await?;
        let tokens: TokensResponse = response.json().await?;
        Ok(tokens.tokens)
    }

    /// Get known chain names
    #[instrument(skip(self))]
    pub async fn get_chains(&self) -> Result<Vec<String>> {
        self.get_named_list("chains").await
    }

    /// Get known protocol names
    #[instrument(skip(self))]
    pub async fn get_protocols(&self) -> Result<Vec<String>> {
        self.get_named_list("protocols").await
    }

    /// Get freshly listed pools with TVL/APY momentum
    #[instrument(skip(self))]
    pub async fn get_new_pools(&self, query: &NewPoolsQuery) -> Result<NewPoolsResponse> {
        if query.symbols.is_empty() {
            return Err(ClientError::InvalidInput(
                "new-pools analytics require at least one symbol".to_string(),
            ));
        }

        let url = format!("{}/analytics/new-pools", self.base_url);
        debug!("Fetching new pools from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&query.to_query_pairs())
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let pools: NewPoolsResponse = response.json().await?;
        Ok(pools)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    async fn get_named_list(&self, path: &str) -> Result<Vec<String>> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Fetching {} from: {}", path, url);

        let response = Self::ensure_success(self.client.get(&url).send().await?).await?;
        let list: NamedListResponse = response.json().await?;
        if let Some(count) = list.count {
            if count as usize != list.items.len() {
                warn!(count, items = list.items.len(), "{} count does not match items", path);
            }
        }
        Ok(list.items)
    }

    /// Turn a non-2xx response into `ClientError::Api`, surfacing `detail` when present
    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorDetail>(&body)
            .map(|detail| detail.message())
            .unwrap_or_else(|_| default_status_message(status, &body));

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn default_status_message(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

#[async_trait]
impl StrategyTransport for StrategyApiClient {
    async fn fetch_strategies(
        &self,
        request: &StrategyRequest,
        cancel: CancelToken,
    ) -> Result<ApiResponse> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        // Dropping the request future aborts the HTTP exchange.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(token = %request.token, "Strategy request cancelled");
                Err(ClientError::Cancelled)
            }
            result = self.post_strategies(request) => result,
        }
    }
}
