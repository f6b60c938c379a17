//! Unified types used by the transport, coordinator and view layers

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use super::errors::ClientError;

/// Risk appetite accepted by the strategy API
///
/// The backend speaks Russian labels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "низкий")]
    Low,
    #[default]
    #[serde(rename = "средний")]
    Medium,
    #[serde(rename = "высокий")]
    High,
}

impl RiskLevel {
    /// Wire label understood by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "низкий",
            RiskLevel::Medium => "средний",
            RiskLevel::High => "высокий",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "низкий" | "low" => Ok(RiskLevel::Low),
            "средний" | "medium" => Ok(RiskLevel::Medium),
            "высокий" | "high" => Ok(RiskLevel::High),
            other => Err(ClientError::InvalidInput(format!(
                "unknown risk level '{}', expected low/medium/high",
                other
            ))),
        }
    }
}

/// Outbound links attached to a strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl StrategyLinks {
    /// Preferred link to open for this strategy
    pub fn primary(&self) -> Option<&str> {
        self.action_url
            .as_deref()
            .or(self.protocol_url.as_deref())
            .or(self.pool_url.as_deref())
    }
}

/// A single yield opportunity as returned by the strategy API
///
/// Read-only on the client: strategies are only filtered and reordered.
/// Fields the client does not interpret are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Protocol/project name
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    /// Pool symbol, e.g. "WETH-USDC"
    #[serde(default)]
    pub symbol: Option<String>,
    /// Current APY in percent
    #[serde(default)]
    pub apy: Option<Decimal>,
    /// APY change over the last 7 days in percentage points
    #[serde(default)]
    pub apy_7d: Option<Decimal>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub tvl_usd: Option<Decimal>,
    #[serde(default, alias = "risk_score")]
    pub score: Option<Decimal>,
    #[serde(flatten)]
    pub links: StrategyLinks,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Strategy {
    /// Composite identity used to deduplicate strategies across lists
    pub fn identity_key(&self) -> String {
        [
            self.platform.as_deref(),
            self.chain.as_deref(),
            self.symbol.as_deref(),
            self.links.pool_url.as_deref(),
            self.links.protocol_url.as_deref(),
            self.links.action_url.as_deref(),
        ]
        .into_iter()
        .map(|part| part.unwrap_or_default())
        .collect::<Vec<_>>()
        .join("|")
    }

    pub fn apy_or_zero(&self) -> Decimal {
        self.apy.unwrap_or_default()
    }

    pub fn tvl_or_zero(&self) -> Decimal {
        self.tvl_usd.unwrap_or_default()
    }
}

/// Summary counters returned next to a strategy list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub matched: Option<u64>,
    #[serde(default)]
    pub considered: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payload of a successful strategy lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyBundle {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub best_strategy: Option<Strategy>,
    #[serde(default, deserialize_with = "non_null_entries")]
    pub alternatives: Vec<Strategy>,
    #[serde(
        default,
        deserialize_with = "optional_non_null_entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub all_strategies: Option<Vec<Strategy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Response of `POST /strategies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    /// At least one strategy matched
    Ok(StrategyBundle),
    /// Nothing matched, or the backend is still collecting data
    Empty {
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        warnings: Vec<String>,
    },
    /// The backend reported a failure in-band
    Error {
        #[serde(default)]
        message: String,
    },
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiResponse::Ok(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ApiResponse::Empty { .. })
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            ApiResponse::Ok(_) => "ok",
            ApiResponse::Empty { .. } => "empty",
            ApiResponse::Error { .. } => "error",
        }
    }

    pub fn bundle(&self) -> Option<&StrategyBundle> {
        match self {
            ApiResponse::Ok(bundle) => Some(bundle),
            _ => None,
        }
    }

    pub fn best_strategy(&self) -> Option<&Strategy> {
        self.bundle().and_then(|b| b.best_strategy.as_ref())
    }

    /// Full ranked list: `all_strategies` when provided, otherwise
    /// the best strategy followed by the alternatives
    pub fn strategies(&self) -> Vec<&Strategy> {
        let Some(bundle) = self.bundle() else {
            return Vec::new();
        };
        match &bundle.all_strategies {
            Some(all) if !all.is_empty() => all.iter().collect(),
            _ => bundle
                .best_strategy
                .iter()
                .chain(bundle.alternatives.iter())
                .collect(),
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            ApiResponse::Ok(bundle) => &bundle.warnings,
            ApiResponse::Empty { warnings, .. } => warnings,
            ApiResponse::Error { .. } => &[],
        }
    }
}

/// Filtering preferences sent with a strategy request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub risk_level: RiskLevel,
    pub include_wrappers: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_tvl: Decimal,
}

/// Body of `POST /strategies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub token: String,
    pub preferences: Preferences,
    pub result_limit: u32,
    /// Ask the backend to skip its own cache
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force_refresh: bool,
}

fn non_null_entries<'de, D>(deserializer: D) -> Result<Vec<Strategy>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_non_null_entries(deserializer)?.unwrap_or_default())
}

fn optional_non_null_entries<'de, D>(deserializer: D) -> Result<Option<Vec<Strategy>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<Strategy>>> = Option::deserialize(deserializer)?;
    Ok(items.map(|list| list.into_iter().flatten().collect()))
}
