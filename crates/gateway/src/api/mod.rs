//! REST API serving chain data to the dashboard

mod error;
mod handlers;
mod listing;
mod responses;
mod routes;

pub use error::{method_not_allowed, route_not_found, status_for, ApiError};
pub use handlers::ApiResult;
pub use responses::*;
pub use routes::*;

use crate::chain::ChainAdapter;
use crate::config::ApiConfig;
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use swapdeck_types::ApiResponse;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Start the API server
pub async fn start_server(
    adapter: Arc<ChainAdapter>,
    config: &ApiConfig,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = create_router(ApiState::new(adapter), config);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Build the application router
pub fn create_router(state: ApiState, config: &ApiConfig) -> Router {
    let app = Router::new()
        .nest(API_PREFIX, create_api_routes())
        .route("/health", get(health_handler))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_request_size_mb * 1024 * 1024));

    let app = if config.enable_cors {
        app.layer(cors_layer())
    } else {
        app
    };

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Health check handler
async fn health_handler(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    let chain = state.adapter.config();
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cluster: chain.cluster.to_string(),
        data_source: chain.data_source.as_str().to_string(),
        chain_client_initialized: state.adapter.is_initialized(),
    }))
}

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub adapter: Arc<ChainAdapter>,
}

impl ApiState {
    pub fn new(adapter: Arc<ChainAdapter>) -> Self {
        Self { adapter }
    }
}
