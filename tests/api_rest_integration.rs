//! Integration tests for the strategy REST API client
//!
//! Every test runs against a local wiremock server; no external network
//! access is required.

mod common;

use common::api_responses;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use strategy_scout::api::messages::{AnalyticsPeriod, NewPoolsQuery};
use strategy_scout::common::cancel::cancel_pair;
use strategy_scout::common::types::{Preferences, RiskLevel, StrategyRequest};
use strategy_scout::{ClientError, StrategyApiClient, StrategyTransport};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(server: &MockServer) -> StrategyApiClient {
    StrategyApiClient::new(&server.uri()).expect("Failed to create REST client")
}

fn eth_request() -> StrategyRequest {
    StrategyRequest {
        token: "ETH".to_string(),
        preferences: Preferences {
            risk_level: RiskLevel::Medium,
            include_wrappers: true,
            min_tvl: dec!(1000000),
        },
        result_limit: 200,
        force_refresh: false,
    }
}

// ============================================================================
// Strategy Query Tests
// ============================================================================

#[tokio::test]
async fn test_post_strategies_sends_wire_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/strategies"))
        .and(body_partial_json(json!({
            "token": "ETH",
            "preferences": {
                "risk_level": "средний",
                "include_wrappers": true,
                "min_tvl": 1000000.0
            },
            "result_limit": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_responses::STRATEGIES_OK))
        .expect(1)
        .mount(&server)
        .await;

    let response = create_test_client(&server)
        .post_strategies(&eth_request())
        .await
        .expect("strategy query failed");

    assert!(response.is_ok());
    assert_eq!(
        response.best_strategy().and_then(|s| s.platform.as_deref()),
        Some("aave-v3")
    );
    assert_eq!(response.strategies().len(), 5);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("force_refresh").is_none());
}

#[tokio::test]
async fn test_accepted_empty_response_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/strategies"))
        .respond_with(ResponseTemplate::new(202).set_body_string(api_responses::STRATEGIES_EMPTY))
        .mount(&server)
        .await;

    let response = create_test_client(&server)
        .post_strategies(&eth_request())
        .await
        .expect("202 should decode");

    assert!(response.is_empty());
    assert_eq!(response.warnings().to_vec(), vec!["fresh-data-requested".to_string()]);
    assert!(response.strategies().is_empty());
}

#[tokio::test]
async fn test_error_detail_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/strategies"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Unsupported token: XYZ"})),
        )
        .mount(&server)
        .await;

    let err = create_test_client(&server)
        .post_strategies(&eth_request())
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, ref message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Unsupported token: XYZ");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(err.user_message(), "Unsupported token: XYZ");
}

#[tokio::test]
async fn test_status_without_detail_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/strategies"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = create_test_client(&server)
        .post_strategies(&eth_request())
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/strategies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = create_test_client(&server)
        .post_strategies(&eth_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::JsonParse(_)));
    assert_eq!(err.user_message(), "The strategy service returned malformed data");
}

#[tokio::test]
async fn test_transport_honours_cancellation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/strategies"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(api_responses::STRATEGIES_OK)
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let (handle, token) = cancel_pair();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        handle.cancel();
    });

    let started = std::time::Instant::now();
    let err = client
        .fetch_strategies(&eth_request(), token)
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
}

// ============================================================================
// Reference Data Tests
// ============================================================================

#[tokio::test]
async fn test_get_tokens_with_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tokens"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_responses::TOKENS))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = create_test_client(&server).get_tokens(Some(50)).await.unwrap();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].symbol, "ETH");
    assert_eq!(tokens[1].slug, None);
}

#[tokio::test]
async fn test_get_chains_and_protocols() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chains"))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_responses::CHAINS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/protocols"))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_responses::PROTOCOLS))
        .mount(&server)
        .await;

    let client = create_test_client(&server);

    assert_eq!(
        client.get_chains().await.unwrap(),
        vec!["Arbitrum", "Base", "Ethereum"]
    );
    assert_eq!(client.get_protocols().await.unwrap(), vec!["aave-v3", "lido"]);
}

#[tokio::test]
async fn test_get_new_pools_repeats_list_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/new-pools"))
        .and(query_param("period", "30d"))
        .and(query_param("sort", "momentum"))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_responses::NEW_POOLS))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = NewPoolsQuery::new(vec!["ETH".into(), "USDC".into()]);
    query.chains = vec!["Base".into()];
    query.period = AnalyticsPeriod::Month;

    let response = create_test_client(&server).get_new_pools(&query).await.unwrap();

    assert_eq!(response.count, 1);
    assert_eq!(response.pools[0].pair, "WETH-USDC");
    assert_eq!(response.pools[0].apy, dec!(18.5));

    let requests = server.received_requests().await.unwrap();
    let symbols: Vec<String> = requests[0]
        .url
        .query_pairs()
        .filter(|(k, _)| k == "symbols")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(symbols, vec!["ETH", "USDC"]);
}

#[tokio::test]
async fn test_get_new_pools_requires_symbols() {
    let server = MockServer::start().await;

    let err = create_test_client(&server)
        .get_new_pools(&NewPoolsQuery::new(Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidInput(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let err = StrategyApiClient::new("not a url").unwrap_err();
    assert!(matches!(err, ClientError::Configuration(_)));
}
