//! API response types

use serde::{Deserialize, Serialize};
use swapdeck_types::{Farm, Pool, SwapTransactionBundle, Token, TokenRef};

/// Response for the paginated token list
#[derive(Debug, Serialize, Deserialize)]
pub struct TokensResponse {
    pub tokens: Vec<Token>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Pool as shown in the pool browser. Amounts are decimal strings; `apy`
/// and `fee` are percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub pool_type: String,
    pub program_id: String,
    pub token0: TokenRef,
    pub token1: TokenRef,
    pub reserve0: String,
    pub reserve1: String,
    pub total_liquidity: String,
    pub volume_24h: String,
    pub apy: String,
    pub fee: String,
    pub lp_mint: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolsResponse {
    pub pools: Vec<PoolSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolsByMintsResponse {
    pub pools: Vec<Pool>,
    pub count: u64,
    pub has_next_page: bool,
    pub page: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FarmsResponse {
    pub farms: Vec<Farm>,
    pub total: usize,
}

/// Quote reshaped for the swap form. `amountOut` and `outputAmount` carry
/// the same value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteResponse {
    pub input_mint: String,
    pub output_mint: String,
    pub input_amount: String,
    pub amount_out: String,
    pub output_amount: String,
    pub minimum_amount_out: String,
    pub price_impact: String,
    pub fee: String,
    /// Slippage tolerance in percent
    pub slippage: String,
    pub slippage_bps: u16,
    pub route: Vec<String>,
    pub pool_id: String,
    pub gas_estimate: String,
}

/// Unsigned bundle plus the reason it cannot be executed here
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBuildResponse {
    pub transaction: SwapTransactionBundle,
    pub minimum_amount_out: String,
    pub gas_estimate: String,
    pub executable: bool,
    pub execution_note: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub cluster: String,
    pub data_source: String,
    pub chain_client_initialized: bool,
}
