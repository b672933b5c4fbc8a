//! Chain client adapter
//!
//! Owns the one session against the external data source and exposes the
//! normalized query operations the handlers call. The session is created on
//! first use behind a single-flight guard: concurrent first callers wait on
//! the same initialization, and a failed initialization leaves the slot empty
//! so the next call tries again.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use solana_sdk::pubkey::Pubkey;
use swapdeck_types::{
    Farm, GatewayError, GatewayResult, PlannedInstruction, Pool, PoolPage, PoolQuery, Portfolio,
    SwapQuote, SwapTransactionBundle, Token, TokenDetails, WalletTokenAccounts, UNKNOWN_NAME,
    UNKNOWN_SYMBOL,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::client::{ChainClient, ChainConnector, RawToken};
use super::placeholder;
use crate::config::ChainConfig;

/// Output multiplier used when a pool reports no usable price
pub const FALLBACK_OUTPUT_FACTOR: f64 = 0.98;

const ASSOCIATED_TOKEN_PROGRAM: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";

/// Lazily-initialized facade over a [`ChainClient`]
pub struct ChainAdapter {
    config: ChainConfig,
    connector: Arc<dyn ChainConnector>,
    client: OnceCell<Arc<dyn ChainClient>>,
    timeout: Duration,
}

impl ChainAdapter {
    pub fn new(config: ChainConfig, connector: Arc<dyn ChainConnector>) -> Self {
        let timeout = config.request_timeout();
        Self {
            config,
            connector,
            client: OnceCell::new(),
            timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Drop the current session; the next call reconnects
    pub fn reset(&mut self) {
        if self.client.take().is_some() {
            info!("Chain client session reset");
        }
    }

    /// Connect on first use. Idempotent, and concurrent callers share one
    /// connection attempt.
    pub async fn ensure_initialized(&self) -> GatewayResult<Arc<dyn ChainClient>> {
        self.client
            .get_or_try_init(|| async {
                info!("Initializing chain client for {}", self.config.cluster);
                let connected = tokio::time::timeout(self.timeout, self.connector.connect(&self.config))
                    .await
                    .map_err(|_| {
                        GatewayError::AdapterInit(format!("connection timed out after {:?}", self.timeout))
                    })?;

                let client = connected.map_err(|e| match e {
                    init @ GatewayError::AdapterInit(_) => init,
                    other => GatewayError::AdapterInit(other.to_string()),
                })?;
                info!("Chain client initialized successfully");
                Ok::<_, GatewayError>(client)
            })
            .await
            .cloned()
    }

    async fn timed<T, F>(&self, fut: F) -> GatewayResult<T>
    where
        F: Future<Output = GatewayResult<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))?
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Every token in the loaded token map, sorted by symbol then address
    pub async fn list_tokens(&self) -> GatewayResult<Vec<Token>> {
        let client = self.ensure_initialized().await?;
        let mut tokens: Vec<Token> = client.token_map().values().map(normalize_token).collect();
        tokens.sort_by(|a, b| a.symbol.cmp(&b.symbol).then_with(|| a.address.cmp(&b.address)));
        Ok(tokens)
    }

    /// Token metadata augmented with the mint account's on-chain state
    pub async fn token_details(&self, address: &str) -> GatewayResult<TokenDetails> {
        let client = self.ensure_initialized().await?;
        let token = self.resolve_token(client.as_ref(), address).await?;

        let (is_initialized, program_id) = match Pubkey::from_str(address) {
            Ok(pubkey) => match self.timed(client.account_owner(&pubkey)).await {
                Ok(owner) => (owner.is_some(), owner),
                Err(e) => {
                    warn!("Account lookup for {} failed: {}", address, e);
                    (false, None)
                }
            },
            Err(_) => {
                debug!("Token address {} is not a valid public key", address);
                (false, None)
            }
        };

        Ok(TokenDetails {
            token,
            is_initialized,
            program_id,
        })
    }

    /// Token map first, then the data source's secondary lookup
    async fn resolve_token(&self, client: &dyn ChainClient, address: &str) -> GatewayResult<Token> {
        if let Some(raw) = client.token_map().get(address) {
            return Ok(normalize_token(raw));
        }

        let found = self.timed(client.lookup_tokens(&[address.to_string()])).await?;
        found
            .iter()
            .find(|raw| raw.address == address)
            .map(normalize_token)
            .ok_or_else(|| GatewayError::TokenNotFound {
                address: address.to_string(),
            })
    }

    // ========================================================================
    // Pools
    // ========================================================================

    /// First page of the general pool list, with token symbols taken from
    /// the token map where it knows them
    pub async fn list_pools(&self) -> GatewayResult<Vec<Pool>> {
        let client = self.ensure_initialized().await?;
        let page = self.timed(client.fetch_pool_list(1)).await?;
        let tokens = client.token_map();

        Ok(page
            .data
            .into_iter()
            .map(|mut pool| {
                for side in [&mut pool.mint_a, &mut pool.mint_b] {
                    if let Some(symbol) = tokens.get(&side.address).and_then(|t| non_empty(t.symbol.as_deref())) {
                        side.symbol = symbol.to_string();
                    }
                }
                pool
            })
            .collect())
    }

    /// Pools trading the queried mints; an empty result is an error
    pub async fn pools_by_mints(&self, query: &PoolQuery) -> GatewayResult<PoolPage> {
        let client = self.ensure_initialized().await?;
        let page = self.timed(client.fetch_pools_by_mints(query)).await?;
        if page.data.is_empty() {
            return Err(GatewayError::NoPoolsFound {
                mint1: query.mint1.clone(),
                mint2: query.mint2.clone(),
            });
        }
        Ok(page)
    }

    /// Most liquid pool trading exactly this pair
    async fn best_pool(&self, input_mint: &str, output_mint: &str) -> GatewayResult<Pool> {
        let query = PoolQuery::for_mints(input_mint, Some(output_mint.to_string()));
        let page = self.pools_by_mints(&query).await?;
        page.data
            .into_iter()
            .filter(|pool| pool.matches_pair(input_mint, output_mint))
            .max_by(|a, b| a.tvl.partial_cmp(&b.tvl).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| GatewayError::NoPoolsFound {
                mint1: input_mint.to_string(),
                mint2: Some(output_mint.to_string()),
            })
    }

    // ========================================================================
    // Swaps
    // ========================================================================

    /// Best-effort swap estimate. See [`estimate_swap`] for what is and is not
    /// modelled.
    pub async fn swap_quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: &str,
        slippage_bps: u16,
    ) -> GatewayResult<SwapQuote> {
        let (quote, _) = self
            .quote_with_pool(input_mint, output_mint, amount, slippage_bps)
            .await?;
        Ok(quote)
    }

    async fn quote_with_pool(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: &str,
        slippage_bps: u16,
    ) -> GatewayResult<(SwapQuote, Pool)> {
        let client = self.ensure_initialized().await?;
        let input = self.resolve_token(client.as_ref(), input_mint).await?;
        self.resolve_token(client.as_ref(), output_mint).await?;

        let amount_ui = parse_amount(amount)?;
        let amount_raw = scale_amount(amount, input.decimals)?;
        let pool = self.best_pool(input_mint, output_mint).await?;

        let estimate = estimate_swap(&pool, input_mint, amount_ui);

        debug!(
            "Quote {} {} -> {} via {}: {:?}",
            amount, input_mint, output_mint, pool.id, estimate
        );

        let quote = SwapQuote {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            input_amount: amount.to_string(),
            input_amount_raw: amount_raw,
            output_amount: estimate.output_amount.to_string(),
            price_impact: format!("{:.4}", estimate.price_impact),
            fee: format!("{}", round_to(estimate.fee_percent, 6)),
            slippage: (f64::from(slippage_bps) / 100.0).to_string(),
            slippage_bps,
            pool_id: pool.id.clone(),
            route: vec![input_mint.to_string(), output_mint.to_string()],
        };
        Ok((quote, pool))
    }

    /// Unsigned transaction bundle for a swap. The bundle cannot be executed.
    pub async fn build_swap_transaction(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: &str,
        slippage_bps: u16,
        user_public_key: &str,
    ) -> GatewayResult<SwapTransactionBundle> {
        let user = Pubkey::from_str(user_public_key)
            .map_err(|_| GatewayError::invalid_argument("Invalid userPublicKey"))?;

        let (quote, pool) = self
            .quote_with_pool(input_mint, output_mint, amount, slippage_bps)
            .await?;
        let client = self.ensure_initialized().await?;
        let recent_blockhash = self.timed(client.latest_blockhash()).await?;

        let user = user.to_string();
        let instructions = vec![
            PlannedInstruction {
                program_id: ASSOCIATED_TOKEN_PROGRAM.to_string(),
                name: "createAssociatedTokenAccountIdempotent".to_string(),
                accounts: vec![user.clone(), output_mint.to_string()],
            },
            PlannedInstruction {
                program_id: pool.program_id,
                name: "swapBaseIn".to_string(),
                accounts: vec![
                    quote.pool_id.clone(),
                    user.clone(),
                    input_mint.to_string(),
                    output_mint.to_string(),
                ],
            },
        ];

        let mut ext_info = Map::new();
        ext_info.insert("estimatedOutput".to_string(), json!(quote.output_amount));
        ext_info.insert("priceImpact".to_string(), json!(quote.price_impact));
        ext_info.insert("fee".to_string(), json!(quote.fee));
        ext_info.insert("route".to_string(), Value::from(quote.route.clone()));

        Ok(SwapTransactionBundle {
            input_mint: quote.input_mint,
            output_mint: quote.output_mint,
            amount_in: quote.input_amount,
            amount_in_raw: quote.input_amount_raw,
            slippage_bps,
            user_public_key: user,
            pool_id: quote.pool_id,
            recent_blockhash,
            instructions,
            ext_info,
        })
    }

    // ========================================================================
    // Placeholder data
    // ========================================================================

    /// Static farm table
    pub fn list_farms(&self) -> Vec<Farm> {
        placeholder::farm_table(Utc::now())
    }

    /// Demo wallet token accounts. There is no wallet binding, so this
    /// always returns flagged demo data rather than failing.
    pub fn wallet_token_accounts(&self, force_update: bool) -> WalletTokenAccounts {
        debug!("Wallet token accounts requested (force_update={})", force_update);
        placeholder::demo_token_accounts(Utc::now())
    }

    pub fn portfolio(&self, wallet_address: &str) -> Portfolio {
        placeholder::demo_portfolio(wallet_address)
    }
}

// ============================================================================
// Normalization and estimation helpers
// ============================================================================

/// Fill in defaults for missing token metadata
pub fn normalize_token(raw: &RawToken) -> Token {
    Token {
        address: raw.address.clone(),
        symbol: non_empty(raw.symbol.as_deref()).unwrap_or(UNKNOWN_SYMBOL).to_string(),
        name: non_empty(raw.name.as_deref()).unwrap_or(UNKNOWN_NAME).to_string(),
        decimals: raw.decimals,
        logo_uri: raw.logo_uri.clone().filter(|uri| !uri.is_empty()),
        tags: raw.tags.clone().unwrap_or_default(),
        extensions: raw.extensions.clone().unwrap_or_default(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a positive, finite UI amount. Any magnitude an `f64` holds is
/// accepted.
pub fn parse_amount(amount: &str) -> GatewayResult<f64> {
    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(GatewayError::invalid_argument("Invalid amount")),
    }
}

/// Scale a UI amount to raw units, truncating sub-unit dust.
///
/// Exact decimal arithmetic is used while the amount fits a `Decimal`
/// (28 significant digits); larger or finer amounts are scaled as floats.
pub fn scale_amount(amount: &str, decimals: u8) -> GatewayResult<String> {
    let text = amount.trim();
    let exact = Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .zip(10u64.checked_pow(u32::from(decimals)).map(Decimal::from))
        .and_then(|(value, factor)| value.checked_mul(factor));
    if let Some(raw) = exact {
        return Ok(raw.trunc().to_string());
    }

    let raw = (parse_amount(text)? * 10f64.powi(i32::from(decimals))).trunc();
    if !raw.is_finite() {
        return Err(GatewayError::invalid_argument("Amount too large"));
    }
    Ok(format!("{:.0}", raw))
}

/// Swap estimate in UI units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapEstimate {
    pub output_amount: f64,
    /// Percent
    pub price_impact: f64,
    /// Percent
    pub fee_percent: f64,
}

/// Rough output estimate from a pool snapshot.
///
/// Output is `amount * price * (1 - fee)` using the pool's reported spot
/// price, or `amount * 0.98` when the pool has no usable price. Price impact
/// is the constant-product estimate `amount / (reserve_in + amount)`. Neither
/// models ticks, curve shape or pending state, so this is not suitable for
/// pricing real trades.
pub fn estimate_swap(pool: &Pool, input_mint: &str, amount: f64) -> SwapEstimate {
    let fee_rate = if pool.fee_rate.is_finite() {
        pool.fee_rate.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let output_amount = match pool.directional_price(input_mint) {
        Some(price) => amount * price * (1.0 - fee_rate),
        None => amount * FALLBACK_OUTPUT_FACTOR,
    };

    let price_impact = match pool.reserve_of(input_mint) {
        Some(reserve) => amount / (reserve + amount) * 100.0,
        None => 0.0,
    };

    SwapEstimate {
        output_amount,
        price_impact,
        fee_percent: fee_rate * 100.0,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
