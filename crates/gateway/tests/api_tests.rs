//! API integration tests

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use swapdeck_gateway::api::{create_router, ApiState};
use swapdeck_gateway::chain::{ChainAdapter, FixtureConnector};
use swapdeck_gateway::config::{ApiConfig, ChainConfig, DataSource};
use swapdeck_types::{SOL_MINT, USDC_MINT, USDT_MINT};
use tower::ServiceExt; // for `oneshot`

const USER_KEY: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// Create a test API backed by fixture chain data
fn create_test_api(connector: Arc<FixtureConnector>) -> Router {
    let chain = ChainConfig {
        data_source: DataSource::Fixture,
        ..ChainConfig::default()
    };
    let adapter = Arc::new(ChainAdapter::new(chain, connector));
    create_router(ApiState::new(adapter), &ApiConfig::default())
}

fn default_api() -> Router {
    create_test_api(Arc::new(FixtureConnector::new()))
}

fn get(uri: &str) -> Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

fn post_json(uri: &str, body: Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

/// Send a request and check the envelope invariant on the response
async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: Value = serde_json::from_slice(&body)?;

    let success = json["success"].as_bool().expect("success flag");
    let has_data = !json["data"].is_null();
    let has_error = !json["error"].is_null();
    assert_eq!(success, !has_error, "success iff error is null: {}", json);
    assert!(has_data != has_error, "exactly one of data/error: {}", json);
    assert!(json["timestamp"].as_str().is_some_and(|t| t.ends_with('Z')));

    Ok((status, json))
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_lazy_initialization() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, get("/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["service"], "swapdeck-gateway");
    assert_eq!(body["data"]["chainClientInitialized"], false);

    send(&app, get("/api/v1/tokens")?).await?;

    let (_, body) = send(&app, get("/health")?).await?;
    assert_eq!(body["data"]["chainClientInitialized"], true);
    assert_eq!(body["data"]["dataSource"], "fixture");

    Ok(())
}

// ============================================================================
// Tokens
// ============================================================================

#[tokio::test]
async fn test_token_list_pagination() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, get("/api/v1/tokens?limit=2&offset=0")?).await?;
    assert_eq!(status, StatusCode::OK);
    let tokens = body["data"]["tokens"].as_array().unwrap();
    let total = body["data"]["total"].as_u64().unwrap();
    assert!(tokens.len() <= 2);
    assert!(total >= tokens.len() as u64);
    assert_eq!(body["data"]["limit"], 2);

    let (status, body) = send(&app, get("/api/v1/tokens?limit=5&offset=100")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["tokens"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_token_list_defaults_and_normalization() -> Result<()> {
    let app = default_api();

    let (_, body) = send(&app, get("/api/v1/tokens")?).await?;
    assert_eq!(body["data"]["limit"], 100);
    assert_eq!(body["data"]["offset"], 0);

    let tokens = body["data"]["tokens"].as_array().unwrap();
    let unknown = tokens
        .iter()
        .find(|t| t["symbol"] == "Unknown")
        .expect("token without metadata is listed");
    assert_eq!(unknown["name"], "Unknown Token");
    assert_eq!(unknown["tags"], json!([]));
    assert_eq!(unknown["extensions"], json!({}));
    assert!(unknown["logoUri"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_token_list_rejects_bad_limit() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, get("/api/v1/tokens?limit=lots")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid limit");

    Ok(())
}

#[tokio::test]
async fn test_token_list_is_idempotent() -> Result<()> {
    let app = default_api();

    let (_, first) = send(&app, get("/api/v1/tokens")?).await?;
    let (_, second) = send(&app, get("/api/v1/tokens")?).await?;
    assert_eq!(first["data"]["tokens"], second["data"]["tokens"]);

    Ok(())
}

#[tokio::test]
async fn test_token_details_known_and_unknown() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, get(&format!("/api/v1/tokens/{}", SOL_MINT))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["address"], SOL_MINT);
    assert_eq!(body["data"]["isInitialized"], true);

    let unknown = "11111111111111111111111111111111";
    let (status, body) = send(&app, get(&format!("/api/v1/tokens/{}", unknown))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Token not found");

    Ok(())
}

#[tokio::test]
async fn test_token_accounts_are_flagged_demo_data() -> Result<()> {
    let app = default_api();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/tokens/accounts")
        .body(Body::empty())?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["warning"].as_str().is_some());
    assert_eq!(body["data"]["accounts"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, post_json("/api/v1/tokens/accounts", json!({"forceUpdate": true}))?).await?;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/tokens/accounts")
        .body(Body::from("{not json"))?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    Ok(())
}

// ============================================================================
// Pools
// ============================================================================

#[tokio::test]
async fn test_pool_list_sorted_by_id() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, get("/api/v1/pools?order=asc")?).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]["pools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    let (_, body) = send(&app, get("/api/v1/pools")?).await?;
    let first = body["data"]["pools"][0]["id"].as_str().unwrap();
    assert_eq!(first, *sorted.last().unwrap());
    let top = &body["data"]["pools"][0];
    assert_eq!(top["token0"]["symbol"], "RAY");
    assert_eq!(top["token1"]["symbol"], "USDC");
    assert_eq!(top["fee"], "0.25");
    assert!(top["totalLiquidity"].as_str().is_some());
    assert!(top["apy"].as_str().is_some());

    Ok(())
}

#[tokio::test]
async fn test_pools_by_mints() -> Result<()> {
    let app = default_api();

    let request = post_json(
        "/api/v1/pools/by-mints",
        json!({"mint1": SOL_MINT, "mint2": USDC_MINT, "sort": "volume24h"}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(
        body["data"]["pools"][0]["id"],
        "3ucNos4NbumPLZNWztqGHNFFgkHeRMBQAVemeeomsUxv"
    );

    let request = post_json(
        "/api/v1/pools/by-mints",
        json!({"mint1": SOL_MINT, "type": "standard"}),
    )?;
    let (_, body) = send(&app, request).await?;
    for pool in body["data"]["pools"].as_array().unwrap() {
        assert_eq!(pool["type"], "standard");
    }

    Ok(())
}

#[tokio::test]
async fn test_pools_by_mints_errors() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, post_json("/api/v1/pools/by-mints", json!({}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "mint1 is required");

    let request = post_json(
        "/api/v1/pools/by-mints",
        json!({"mint1": SOL_MINT, "sort": "popularity"}),
    )?;
    let (status, _) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = post_json(
        "/api/v1/pools/by-mints",
        json!({"mint1": USDT_MINT, "mint2": SOL_MINT}),
    )?;
    let (status, _) = send(&app, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

// ============================================================================
// Farms
// ============================================================================

async fn farm_field(app: &Router, uri: &str, field: &str) -> Result<Vec<String>> {
    let (status, body) = send(app, get(uri)?).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"]["farms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f[field].as_str().unwrap().to_string())
        .collect())
}

fn numbers(values: &[String]) -> Vec<f64> {
    values.iter().map(|v| v.parse().unwrap()).collect()
}

#[tokio::test]
async fn test_farm_sorting() -> Result<()> {
    let app = default_api();

    let apy = numbers(&farm_field(&app, "/api/v1/farms?sortBy=apy", "apy").await?);
    assert!(apy.windows(2).all(|w| w[0] >= w[1]));

    let staked = numbers(&farm_field(&app, "/api/v1/farms?sortBy=totalStaked", "totalStaked").await?);
    assert!(staked.windows(2).all(|w| w[0] >= w[1]));

    let names = farm_field(&app, "/api/v1/farms?sortBy=whatever", "name").await?;
    assert!(names.windows(2).all(|w| w[0] <= w[1]));

    Ok(())
}

#[tokio::test]
async fn test_farm_status_filter() -> Result<()> {
    let app = default_api();

    let statuses = farm_field(&app, "/api/v1/farms?status=active", "status").await?;
    assert!(!statuses.is_empty());
    assert!(statuses.iter().all(|s| s == "active"));

    Ok(())
}

// ============================================================================
// Swaps
// ============================================================================

#[tokio::test]
async fn test_swap_quote_minimum_amount_out() -> Result<()> {
    let app = default_api();

    let request = post_json(
        "/api/v1/swap/quote",
        json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": "1", "slippageTolerance": "0.5"}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    let output: f64 = data["amountOut"].as_str().unwrap().parse()?;
    assert_eq!(data["outputAmount"], data["amountOut"]);
    let minimum: f64 = data["minimumAmountOut"].as_str().unwrap().parse()?;
    assert!((minimum - output * (1.0 - 0.005)).abs() < 1e-9);
    assert_eq!(data["slippageBps"], 50);
    assert_eq!(data["gasEstimate"], "150000");
    assert_eq!(data["route"], json!([SOL_MINT, USDC_MINT]));
    // Most liquid SOL/USDC pool
    assert_eq!(data["poolId"], "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2");

    Ok(())
}

#[tokio::test]
async fn test_swap_quote_default_slippage() -> Result<()> {
    let app = default_api();

    let request = post_json(
        "/api/v1/swap/quote",
        json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": 2}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slippage"], "0.5");

    Ok(())
}

#[tokio::test]
async fn test_swap_quote_accepts_any_positive_amount() -> Result<()> {
    let app = default_api();

    for amount in ["123456789012345678901234567890", "1e-30", "+1", ".5"] {
        let request = post_json(
            "/api/v1/swap/quote",
            json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": amount}),
        )?;
        let (status, body) = send(&app, request).await?;
        assert_eq!(status, StatusCode::OK, "amount {}: {}", amount, body);
    }

    Ok(())
}

#[tokio::test]
async fn test_swap_quote_validation() -> Result<()> {
    let app = default_api();

    for amount in ["-1", "abc", "0"] {
        let request = post_json(
            "/api/v1/swap/quote",
            json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": amount}),
        )?;
        let (status, body) = send(&app, request).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid amount");
    }

    let request = post_json("/api/v1/swap/quote", json!({"tokenIn": SOL_MINT}))?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tokenIn, tokenOut, and amountIn are required");

    let request = post_json(
        "/api/v1/swap/quote",
        json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": "1", "slippageTolerance": "much"}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid slippageTolerance");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/swap/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"tokenIn\":"))?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    Ok(())
}

#[tokio::test]
async fn test_swap_quote_missing_token_and_pool() -> Result<()> {
    let app = default_api();

    let request = post_json(
        "/api/v1/swap/quote",
        json!({"tokenIn": "11111111111111111111111111111111", "tokenOut": USDC_MINT, "amountIn": "1"}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Token not found");

    let request = post_json(
        "/api/v1/swap/quote",
        json!({"tokenIn": USDT_MINT, "tokenOut": SOL_MINT, "amountIn": "1"}),
    )?;
    let (status, _) = send(&app, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_swap_build() -> Result<()> {
    let app = default_api();

    let request = post_json(
        "/api/v1/swap/build",
        json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": "1.5", "userPublicKey": USER_KEY}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["executable"], false);
    assert_eq!(data["executionNote"], "Swap execution is not implemented");
    assert_eq!(data["transaction"]["amountInRaw"], "1500000000");
    assert_eq!(data["transaction"]["userPublicKey"], USER_KEY);
    assert!(data["transaction"]["recentBlockhash"].as_str().is_some());
    assert_eq!(data["transaction"]["instructions"].as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_swap_build_validation() -> Result<()> {
    let app = default_api();

    let request = post_json(
        "/api/v1/swap/build",
        json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": "1"}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "tokenIn, tokenOut, amountIn, and userPublicKey are required"
    );

    let request = post_json(
        "/api/v1/swap/build",
        json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": "1", "userPublicKey": "not-a-key"}),
    )?;
    let (status, _) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

// ============================================================================
// Portfolio
// ============================================================================

#[tokio::test]
async fn test_portfolio() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, post_json("/api/v1/portfolio", json!({}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "walletAddress is required");

    let (status, body) = send(&app, post_json("/api/v1/portfolio", json!({"walletAddress": USER_KEY}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["walletAddress"], USER_KEY);

    Ok(())
}

// ============================================================================
// Adapter lifecycle
// ============================================================================

#[tokio::test]
async fn test_concurrent_first_use_connects_once() -> Result<()> {
    let connector = Arc::new(FixtureConnector::new().with_latency(Duration::from_millis(50)));
    let app = create_test_api(connector.clone());

    let requests = (0..16).map(|_| {
        let app = app.clone();
        async move { app.oneshot(get("/api/v1/tokens")?).await.map_err(anyhow::Error::from) }
    });
    let responses = futures::future::join_all(requests).await;

    for response in responses {
        assert_eq!(response?.status(), StatusCode::OK);
    }
    assert_eq!(connector.attempts(), 1);
    assert_eq!(connector.connections(), 1);

    Ok(())
}

#[tokio::test]
async fn test_failed_initialization_is_retried() -> Result<()> {
    let connector = Arc::new(FixtureConnector::new().with_failures(1));
    let app = create_test_api(connector.clone());

    let (status, body) = send(&app, get("/api/v1/tokens")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Chain client initialization failed"));

    let (status, _) = send(&app, get("/api/v1/tokens")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(connector.attempts(), 2);
    assert_eq!(connector.connections(), 1);

    Ok(())
}

#[tokio::test]
async fn test_slow_upstream_returns_gateway_timeout() -> Result<()> {
    let connector = Arc::new(FixtureConnector::new().with_query_latency(Duration::from_millis(200)));
    let adapter = ChainAdapter::new(ChainConfig::default(), connector).with_timeout(Duration::from_millis(20));
    let app = create_router(ApiState::new(Arc::new(adapter)), &ApiConfig::default());

    let request = post_json(
        "/api/v1/swap/quote",
        json!({"tokenIn": SOL_MINT, "tokenOut": USDC_MINT, "amountIn": "1"}),
    )?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].as_str().unwrap().starts_with("Timeout"));

    Ok(())
}

// ============================================================================
// Fallbacks
// ============================================================================

#[tokio::test]
async fn test_unknown_route_is_an_envelope() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, get("/api/v1/nope")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("/api/v1/nope"));

    let (status, _) = send(&app, get("/metrics")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_wrong_method_is_an_envelope() -> Result<()> {
    let app = default_api();

    let (status, body) = send(&app, get("/api/v1/swap/quote")?).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["error"].as_str().unwrap().starts_with("Method GET not allowed"));

    let (status, _) = send(&app, post_json("/api/v1/tokens", json!({}))?).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}

#[tokio::test]
async fn test_oversized_body_is_an_envelope() -> Result<()> {
    let app = default_api();
    let oversized = vec![b' '; 2 * 1024 * 1024];

    for path in ["/api/v1/tokens/accounts", "/api/v1/swap/quote"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(oversized.clone()))?;
        let (status, body) = send(&app, request).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    Ok(())
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn test_cors_preflight_on_every_route() -> Result<()> {
    let app = default_api();
    let token_path = format!("/api/v1/tokens/{}", SOL_MINT);
    let paths = [
        "/api/v1/tokens",
        "/api/v1/tokens/accounts",
        token_path.as_str(),
        "/api/v1/pools",
        "/api/v1/pools/by-mints",
        "/api/v1/farms",
        "/api/v1/swap/quote",
        "/api/v1/swap/build",
        "/api/v1/portfolio",
    ];

    for path in paths {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::OK, "preflight for {}", path);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str()?.to_uppercase();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(methods.contains(method), "{} missing {}", path, method);
        }

        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str()?.to_lowercase();
        for name in ["content-type", "authorization", "x-api-key"] {
            assert!(allowed.contains(name), "{} missing {}", path, name);
        }
    }

    Ok(())
}
