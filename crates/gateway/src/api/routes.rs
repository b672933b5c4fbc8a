//! API route definitions

use super::{handlers::*, ApiState};
use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const API_PREFIX: &str = "/api/v1";

/// Create token-related routes
pub fn create_token_routes() -> Router<ApiState> {
    Router::new()
        .route("/tokens", get(list_tokens))
        .route("/tokens/accounts", post(get_token_accounts))
        .route("/tokens/:address", get(get_token))
}

/// Create pool-related routes
pub fn create_pool_routes() -> Router<ApiState> {
    Router::new()
        .route("/pools", get(list_pools))
        .route("/pools/by-mints", post(get_pools_by_mints))
}

/// Create farm routes
pub fn create_farm_routes() -> Router<ApiState> {
    Router::new().route("/farms", get(list_farms))
}

/// Create swap-related routes
pub fn create_swap_routes() -> Router<ApiState> {
    Router::new()
        .route("/swap/quote", post(get_swap_quote))
        .route("/swap/build", post(build_swap))
}

/// Create portfolio routes
pub fn create_portfolio_routes() -> Router<ApiState> {
    Router::new().route("/portfolio", post(get_portfolio))
}

/// All versioned routes, unprefixed
pub fn create_api_routes() -> Router<ApiState> {
    Router::new()
        .merge(create_token_routes())
        .merge(create_pool_routes())
        .merge(create_farm_routes())
        .merge(create_swap_routes())
        .merge(create_portfolio_routes())
}

/// Preflight policy shared by every route
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
}
