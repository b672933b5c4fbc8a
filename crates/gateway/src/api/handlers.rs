//! API request handlers

use super::error::ApiError;
use super::listing::{self, FarmSortKey, DEFAULT_TOKEN_LIMIT};
use super::{responses::*, ApiState};
use crate::chain::adapter::parse_amount;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use swapdeck_types::{
    minimum_amount_out, slippage_to_bps, ApiResponse, Farm, GatewayError, PoolQuery, Portfolio,
    SortOrder, TokenDetails, WalletTokenAccounts, DEFAULT_SLIPPAGE_PERCENT, GAS_ESTIMATE,
};
use tracing::{debug, info};

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

// ============================================================================
// Request types
// ============================================================================

/// Query parameters for pagination
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolListQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmListQuery {
    pub status: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountsRequest {
    #[serde(default)]
    pub force_update: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolsByMintsRequest {
    pub mint1: Option<String>,
    pub mint2: Option<String>,
    #[serde(rename = "type")]
    pub pool_type: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
}

/// Amounts arrive as strings from the dashboard but plain numbers are
/// accepted too
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Text(String),
    Number(f64),
}

impl NumericInput {
    fn as_text(&self) -> String {
        match self {
            NumericInput::Text(text) => text.trim().to_string(),
            NumericInput::Number(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteRequest {
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub amount_in: Option<NumericInput>,
    pub slippage_tolerance: Option<NumericInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBuildRequest {
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub amount_in: Option<NumericInput>,
    pub slippage_tolerance: Option<NumericInput>,
    pub user_public_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRequest {
    pub wallet_address: Option<String>,
}

// ============================================================================
// Validation helpers
// ============================================================================

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Amount text, checked with the same rule the adapter applies
fn validate_amount(input: &NumericInput) -> Result<String, ApiError> {
    let text = input.as_text();
    parse_amount(&text)?;
    Ok(text)
}

/// Slippage percentage in [0, 100]
fn validate_slippage(input: Option<&NumericInput>) -> Result<f64, ApiError> {
    let text = input
        .map(NumericInput::as_text)
        .unwrap_or_else(|| DEFAULT_SLIPPAGE_PERCENT.to_string());
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && (0.0..=100.0).contains(&value) => Ok(value),
        _ => Err(ApiError::invalid_argument("Invalid slippageTolerance")),
    }
}

fn parse_option<T>(raw: Option<&str>) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = GatewayError> + Default,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => Ok(value.parse()?),
        None => Ok(T::default()),
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// List tokens with offset/limit pagination
pub async fn list_tokens(
    State(state): State<ApiState>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> ApiResult<TokensResponse> {
    let Query(query) = query?;
    let limit = listing::parse_count(query.limit.as_deref(), DEFAULT_TOKEN_LIMIT, "limit")?;
    let offset = listing::parse_count(query.offset.as_deref(), 0, "offset")?;

    let tokens = state.adapter.list_tokens().await?;
    let total = tokens.len();

    ok(TokensResponse {
        tokens: listing::page(&tokens, offset, limit),
        total,
        limit,
        offset,
    })
}

/// Get token details
pub async fn get_token(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<TokenDetails> {
    debug!("Token details request: {}", address);
    ok(state.adapter.token_details(address.trim()).await?)
}

/// Wallet token accounts. Demo data, flagged with a warning.
pub async fn get_token_accounts(
    State(state): State<ApiState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<WalletTokenAccounts> {
    let body = body?;
    let request: TokenAccountsRequest = if body.iter().all(u8::is_ascii_whitespace) {
        TokenAccountsRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::invalid_argument(format!("Invalid request body: {}", e)))?
    };

    ok(state.adapter.wallet_token_accounts(request.force_update))
}

// ============================================================================
// Pools
// ============================================================================

/// List pools, ordered by id
pub async fn list_pools(
    State(state): State<ApiState>,
    query: Result<Query<PoolListQuery>, QueryRejection>,
) -> ApiResult<PoolsResponse> {
    let Query(query) = query?;
    let order = match query.order.as_deref() {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    };
    if let Some(sort_by) = &query.sort_by {
        debug!("Pool list sortBy={} ignored, ordering by id", sort_by);
    }

    let mut pools = state.adapter.list_pools().await?;
    listing::sort_pools_by_id(&mut pools, order);
    let pools: Vec<PoolSummary> = pools.into_iter().map(PoolSummary::from).collect();

    ok(PoolsResponse {
        total: pools.len(),
        pools,
    })
}

/// Pools trading a mint or mint pair
pub async fn get_pools_by_mints(
    State(state): State<ApiState>,
    payload: Result<Json<PoolsByMintsRequest>, JsonRejection>,
) -> ApiResult<PoolsByMintsResponse> {
    let Json(request) = payload?;
    let mint1 = required(request.mint1)
        .ok_or_else(|| ApiError::invalid_argument("mint1 is required"))?;

    let mut query = PoolQuery::for_mints(mint1, required(request.mint2));
    query.pool_type = parse_option(request.pool_type.as_deref())?;
    query.sort = parse_option(request.sort.as_deref())?;
    query.order = parse_option(request.order.as_deref())?;
    query.page = match request.page {
        Some(0) => return Err(ApiError::invalid_argument("Invalid page")),
        Some(page) => page,
        None => 1,
    };

    let page = state.adapter.pools_by_mints(&query).await?;
    ok(PoolsByMintsResponse {
        pools: page.data,
        count: page.count,
        has_next_page: page.has_next_page,
        page: query.page,
    })
}

// ============================================================================
// Farms
// ============================================================================

pub async fn list_farms(
    State(state): State<ApiState>,
    query: Result<Query<FarmListQuery>, QueryRejection>,
) -> ApiResult<FarmsResponse> {
    let Query(query) = query?;
    let sort = FarmSortKey::parse(query.sort_by.as_deref());
    let farms: Vec<Farm> = listing::select_farms(state.adapter.list_farms(), query.status.as_deref(), sort);

    ok(FarmsResponse {
        total: farms.len(),
        farms,
    })
}

// ============================================================================
// Swaps
// ============================================================================

/// Estimate a swap
pub async fn get_swap_quote(
    State(state): State<ApiState>,
    payload: Result<Json<SwapQuoteRequest>, JsonRejection>,
) -> ApiResult<SwapQuoteResponse> {
    let Json(request) = payload?;
    let (token_in, token_out, amount_in) = match (
        required(request.token_in),
        required(request.token_out),
        request.amount_in,
    ) {
        (Some(token_in), Some(token_out), Some(amount_in)) => (token_in, token_out, amount_in),
        _ => {
            return Err(ApiError::invalid_argument(
                "tokenIn, tokenOut, and amountIn are required",
            ))
        }
    };

    let amount = validate_amount(&amount_in)?;
    let slippage = validate_slippage(request.slippage_tolerance.as_ref())?;
    let slippage_bps = slippage_to_bps(slippage);

    let quote = state
        .adapter
        .swap_quote(&token_in, &token_out, &amount, slippage_bps)
        .await?;
    let output: f64 = quote.output_amount.parse().unwrap_or(0.0);

    info!(
        "Swap quote {} {} -> {} {} (pool {})",
        amount, token_in, quote.output_amount, token_out, quote.pool_id
    );

    ok(SwapQuoteResponse {
        input_mint: quote.input_mint,
        output_mint: quote.output_mint,
        input_amount: quote.input_amount,
        minimum_amount_out: minimum_amount_out(output, slippage).to_string(),
        amount_out: quote.output_amount.clone(),
        output_amount: quote.output_amount,
        price_impact: quote.price_impact,
        fee: quote.fee,
        slippage: slippage.to_string(),
        slippage_bps,
        route: quote.route,
        pool_id: quote.pool_id,
        gas_estimate: GAS_ESTIMATE.to_string(),
    })
}

/// Build an unsigned swap transaction
pub async fn build_swap(
    State(state): State<ApiState>,
    payload: Result<Json<SwapBuildRequest>, JsonRejection>,
) -> ApiResult<SwapBuildResponse> {
    let Json(request) = payload?;
    let (token_in, token_out, amount_in, user) = match (
        required(request.token_in),
        required(request.token_out),
        request.amount_in,
        required(request.user_public_key),
    ) {
        (Some(token_in), Some(token_out), Some(amount_in), Some(user)) => {
            (token_in, token_out, amount_in, user)
        }
        _ => {
            return Err(ApiError::invalid_argument(
                "tokenIn, tokenOut, amountIn, and userPublicKey are required",
            ))
        }
    };

    let amount = validate_amount(&amount_in)?;
    let slippage = validate_slippage(request.slippage_tolerance.as_ref())?;

    let bundle = state
        .adapter
        .build_swap_transaction(&token_in, &token_out, &amount, slippage_to_bps(slippage), &user)
        .await?;

    let output: f64 = bundle
        .ext_info
        .get("estimatedOutput")
        .and_then(Value::as_str)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    let execution = bundle.execute();

    info!("Built unsigned swap bundle for {} via pool {}", user, bundle.pool_id);

    ok(SwapBuildResponse {
        minimum_amount_out: minimum_amount_out(output, slippage).to_string(),
        gas_estimate: GAS_ESTIMATE.to_string(),
        executable: execution.is_ok(),
        execution_note: execution.err().map(|e| e.to_string()).unwrap_or_default(),
        transaction: bundle,
    })
}

// ============================================================================
// Portfolio
// ============================================================================

pub async fn get_portfolio(
    State(state): State<ApiState>,
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> ApiResult<Portfolio> {
    let Json(request) = payload?;
    let wallet = required(request.wallet_address)
        .ok_or_else(|| ApiError::invalid_argument("walletAddress is required"))?;

    ok(state.adapter.portfolio(&wallet))
}
