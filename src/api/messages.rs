//! Wire types for the auxiliary strategy API endpoints

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Token entry from `GET /tokens`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// `GET /tokens` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokensResponse {
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
}

/// `GET /chains` and `GET /protocols` response
#[derive(Debug, Clone, Deserialize)]
pub struct NamedListResponse {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    /// Flatten `detail` into a single message
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Look-back window for the new-pools analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalyticsPeriod {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl AnalyticsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Day => "24h",
            AnalyticsPeriod::Week => "7d",
            AnalyticsPeriod::Month => "30d",
        }
    }
}

/// Ranking used by the new-pools analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsSort {
    #[default]
    Momentum,
    TvlChange,
    ApyChange,
}

impl AnalyticsSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsSort::Momentum => "momentum",
            AnalyticsSort::TvlChange => "tvl_change",
            AnalyticsSort::ApyChange => "apy_change",
        }
    }
}

/// Query for `GET /analytics/new-pools`
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoolsQuery {
    pub period: AnalyticsPeriod,
    pub min_tvl: Decimal,
    pub sort: AnalyticsSort,
    /// At least one symbol is required by the backend
    pub symbols: Vec<String>,
    pub chains: Vec<String>,
    pub limit: u32,
}

impl NewPoolsQuery {
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            period: AnalyticsPeriod::default(),
            min_tvl: Decimal::from(1_000_000),
            sort: AnalyticsSort::default(),
            symbols,
            chains: Vec::new(),
            limit: 30,
        }
    }

    /// Query pairs; `symbols` and `chains` repeat once per value
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("period", self.period.as_str().to_string()),
            ("min_tvl", self.min_tvl.to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("limit", self.limit.to_string()),
        ];
        pairs.extend(self.symbols.iter().map(|s| ("symbols", s.clone())));
        pairs.extend(self.chains.iter().map(|c| ("chains", c.clone())));
        pairs
    }
}

/// Pool row in the new-pools analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsPool {
    pub pool_id: String,
    pub pair: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    pub tvl_usd: Decimal,
    pub apy: Decimal,
    #[serde(default)]
    pub tvl_change_pct: Option<Decimal>,
    #[serde(default)]
    pub apy_change_pct: Option<Decimal>,
    #[serde(default)]
    pub momentum: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default)]
    pub action_url: Option<String>,
}

/// Filters echoed back by the new-pools analytics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsFilters {
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub chains: Vec<String>,
}

/// `GET /analytics/new-pools` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPoolsResponse {
    pub period: String,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub min_tvl: Option<Decimal>,
    #[serde(default)]
    pub filters: AnalyticsFilters,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub pools: Vec<AnalyticsPool>,
}
