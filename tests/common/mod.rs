//! Common test utilities and fixtures

#![allow(dead_code)]

use rust_decimal_macros::dec;
use std::sync::Arc;
use strategy_scout::common::types::{ApiResponse, Strategy, StrategyBundle, StrategyLinks};
use strategy_scout::config::types::CoordinatorSettings;
use strategy_scout::{StrategyApiClient, StrategyCoordinator};
use wiremock::MockServer;

/// Create a sample strategy for testing
pub fn sample_strategy(platform: &str, symbol: &str) -> Strategy {
    Strategy {
        platform: Some(platform.to_string()),
        chain: Some("Ethereum".to_string()),
        symbol: Some(symbol.to_string()),
        apy: Some(dec!(4.2)),
        apy_7d: Some(dec!(0.3)),
        risk_level: Some("средний".to_string()),
        tvl_usd: Some(dec!(250000000)),
        links: StrategyLinks {
            action_url: Some(format!("https://app.example.org/{}", platform)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Create a successful response with one best strategy
pub fn sample_ok_response(token: &str) -> ApiResponse {
    ApiResponse::Ok(StrategyBundle {
        token: Some(token.to_string()),
        best_strategy: Some(sample_strategy("aave-v3", token)),
        ..Default::default()
    })
}

/// Coordinator talking HTTP to a mock server
pub fn coordinator_for(server: &MockServer) -> StrategyCoordinator {
    let client = StrategyApiClient::new(&server.uri()).expect("Failed to create REST client");
    StrategyCoordinator::new(Arc::new(client), CoordinatorSettings::default())
}

/// Sample API responses for testing
pub mod api_responses {
    /// `POST /strategies` with a ranked list
    pub const STRATEGIES_OK: &str = r#"{
        "status": "ok",
        "token": "ETH",
        "best_strategy": {
            "platform": "aave-v3",
            "chain": "Ethereum",
            "symbol": "WETH",
            "apy": 3.1,
            "apy_7d": 0.2,
            "risk_level": "средний",
            "tvl_usd": 1500000000,
            "action_url": "https://app.aave.com/reserve-overview/?underlyingAsset=weth"
        },
        "alternatives": [
            {"platform": "lido", "chain": "Ethereum", "symbol": "STETH", "apy": 2.9, "tvl_usd": 24000000000},
            null
        ],
        "all_strategies": [
            {
                "platform": "aave-v3",
                "chain": "Ethereum",
                "symbol": "WETH",
                "apy": 3.1,
                "apy_7d": 0.2,
                "risk_level": "средний",
                "tvl_usd": 1500000000,
                "action_url": "https://app.aave.com/reserve-overview/?underlyingAsset=weth"
            },
            {"platform": "lido", "chain": "Ethereum", "symbol": "STETH", "apy": 2.9, "apy_7d": -0.1, "tvl_usd": 24000000000},
            {"platform": "pendle", "chain": "Arbitrum", "symbol": "PT-WEETH", "apy": 11.4, "apy_7d": 6.2, "tvl_usd": 1800000},
            {"platform": "morpho", "chain": "Base", "symbol": "WETH", "apy": 5.6, "apy_7d": 1.1, "tvl_usd": 42000000},
            {"platform": "curve", "chain": "Ethereum", "symbol": "ETH-STETH", "apy": 1.7, "tvl_usd": 310000000}
        ],
        "statistics": {"matched": 5, "considered": 812},
        "warnings": []
    }"#;

    /// HTTP 202 while the backend collects data
    pub const STRATEGIES_EMPTY: &str = r#"{
        "status": "empty",
        "token": "ETH",
        "message": "Collecting fresh data, try again shortly",
        "warnings": ["fresh-data-requested"]
    }"#;

    /// `GET /tokens`
    pub const TOKENS: &str = r#"{
        "tokens": [
            {"symbol": "ETH", "name": "Ethereum", "slug": "ethereum"},
            {"symbol": "USDC", "name": "USD Coin"}
        ]
    }"#;

    /// `GET /chains`
    pub const CHAINS: &str = r#"{"count": 3, "items": ["Arbitrum", "Base", "Ethereum"]}"#;

    /// `GET /protocols`
    pub const PROTOCOLS: &str = r#"{"count": 2, "items": ["aave-v3", "lido"]}"#;

    /// `GET /analytics/new-pools`
    pub const NEW_POOLS: &str = r#"{
        "period": "7d",
        "days": 7,
        "min_tvl": 1000000,
        "filters": {"symbols": ["ETH"], "chains": ["Base"]},
        "count": 1,
        "pools": [
            {
                "pool_id": "0xpool",
                "pair": "WETH-USDC",
                "protocol": "aerodrome",
                "chain": "Base",
                "tvl_usd": 3400000,
                "apy": 18.5,
                "tvl_change_pct": 42.0,
                "apy_change_pct": -3.5,
                "momentum": 0.81,
                "category": "new",
                "first_seen": "2024-05-01"
            }
        ]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_strategy() {
        let strategy = sample_strategy("aave-v3", "ETH");
        assert_eq!(strategy.apy, Some(dec!(4.2)));
        assert!(strategy.links.primary().is_some());
    }

    #[test]
    fn test_fixture_responses_decode() {
        let ok: ApiResponse = serde_json::from_str(api_responses::STRATEGIES_OK).unwrap();
        assert!(ok.is_ok());
        let empty: ApiResponse = serde_json::from_str(api_responses::STRATEGIES_EMPTY).unwrap();
        assert!(empty.is_empty());
    }
}
