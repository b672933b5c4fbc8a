//! Live chain client backed by the Raydium API v3 and a Solana RPC node

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use swapdeck_types::{
    GatewayError, GatewayResult, Pool, PoolDayStats, PoolPage, PoolQuery, PoolType, TokenRef,
    POOL_PAGE_SIZE, UNKNOWN_NAME, UNKNOWN_SYMBOL,
};
use tracing::{debug, info, warn};

use super::client::{ChainClient, ChainConnector, RawToken};
use super::rpc_client::LightRpcClient;
use crate::config::ChainConfig;

/// Envelope the Raydium API wraps every payload in
#[derive(Debug, Deserialize)]
struct RaydiumResponse<T> {
    success: bool,
    data: Option<T>,
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintListData {
    mint_list: Vec<RawToken>,
    #[serde(default)]
    blacklist: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaydiumPoolPage {
    #[serde(default)]
    count: u64,
    data: Vec<RaydiumPool>,
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaydiumPoolMint {
    address: String,
    symbol: Option<String>,
    name: Option<String>,
    #[serde(default)]
    decimals: u8,
}

#[derive(Debug, Deserialize)]
struct RaydiumLpMint {
    address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaydiumDayStats {
    #[serde(default)]
    volume: f64,
    #[serde(default)]
    volume_fee: f64,
    #[serde(default)]
    apr: f64,
}

/// Pool record as served by `/pools/info/*`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaydiumPool {
    id: String,
    #[serde(rename = "type")]
    pool_type: String,
    program_id: String,
    mint_a: RaydiumPoolMint,
    mint_b: RaydiumPoolMint,
    lp_mint: Option<RaydiumLpMint>,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    mint_amount_a: f64,
    #[serde(default)]
    mint_amount_b: f64,
    #[serde(default)]
    fee_rate: f64,
    #[serde(default)]
    tvl: f64,
    #[serde(default)]
    day: RaydiumDayStats,
}

impl From<RaydiumPoolMint> for TokenRef {
    fn from(mint: RaydiumPoolMint) -> Self {
        TokenRef {
            address: mint.address,
            symbol: mint.symbol.unwrap_or_else(|| UNKNOWN_SYMBOL.to_string()),
            name: mint.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            decimals: mint.decimals,
        }
    }
}

impl From<RaydiumPool> for Pool {
    fn from(pool: RaydiumPool) -> Self {
        let pool_type = if pool.pool_type.eq_ignore_ascii_case("concentrated") {
            PoolType::Concentrated
        } else {
            PoolType::Standard
        };

        Pool {
            id: pool.id,
            pool_type,
            program_id: pool.program_id,
            mint_a: pool.mint_a.into(),
            mint_b: pool.mint_b.into(),
            lp_mint: pool.lp_mint.map(|lp| lp.address),
            price: pool.price,
            mint_amount_a: pool.mint_amount_a,
            mint_amount_b: pool.mint_amount_b,
            fee_rate: pool.fee_rate,
            tvl: pool.tvl,
            day: PoolDayStats {
                volume: pool.day.volume,
                volume_fee: pool.day.volume_fee,
                apr: pool.day.apr,
            },
        }
    }
}

impl From<RaydiumPoolPage> for PoolPage {
    fn from(page: RaydiumPoolPage) -> Self {
        PoolPage {
            count: page.count,
            data: page.data.into_iter().map(Pool::from).collect(),
            has_next_page: page.has_next_page,
        }
    }
}

/// Session holding the loaded token map plus the HTTP and RPC clients
pub struct RaydiumClient {
    http: reqwest::Client,
    api_base: String,
    rpc: LightRpcClient,
    tokens: HashMap<String, RawToken>,
}

impl RaydiumClient {
    /// Connect and load the token map
    pub async fn load(config: &ChainConfig) -> GatewayResult<Self> {
        let http = build_http_client(config.request_timeout())?;
        let api_base = config.api_base_url().trim_end_matches('/').to_string();
        let rpc = LightRpcClient::with_http_client(config.rpc_url.clone(), http.clone());

        let mut client = Self {
            http,
            api_base,
            rpc,
            tokens: HashMap::new(),
        };

        let mint_list: MintListData = client
            .get_json("/mint/list", &[])
            .await
            .map_err(|e| GatewayError::AdapterInit(format!("token list: {}", e)))?;
        client.tokens = build_token_map(mint_list);

        info!(
            "Loaded {} tokens from {} ({}), RPC {}",
            client.tokens.len(),
            client.api_base,
            config.cluster,
            client.rpc.url()
        );
        Ok(client)
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> GatewayResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.api_base, path);
        debug!("Raydium API GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::upstream(format!("GET {} failed: {}", path, e)))?
            .error_for_status()
            .map_err(|e| GatewayError::upstream(format!("GET {} failed: {}", path, e)))?;

        let body: RaydiumResponse<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::upstream(format!("GET {} returned invalid JSON: {}", path, e)))?;

        if !body.success {
            return Err(GatewayError::upstream(format!(
                "GET {} unsuccessful: {}",
                path,
                body.msg.unwrap_or_default()
            )));
        }

        body.data
            .ok_or_else(|| GatewayError::upstream(format!("GET {} returned no data", path)))
    }
}

fn build_http_client(timeout: Duration) -> GatewayResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::AdapterInit(format!("HTTP client: {}", e)))
}

fn build_token_map(mint_list: MintListData) -> HashMap<String, RawToken> {
    let blacklist: std::collections::HashSet<String> = mint_list.blacklist.into_iter().collect();
    mint_list
        .mint_list
        .into_iter()
        .filter(|token| !blacklist.contains(&token.address))
        .map(|token| (token.address.clone(), token))
        .collect()
}

#[async_trait]
impl ChainClient for RaydiumClient {
    fn token_map(&self) -> &HashMap<String, RawToken> {
        &self.tokens
    }

    async fn lookup_tokens(&self, mints: &[String]) -> GatewayResult<Vec<RawToken>> {
        if mints.is_empty() {
            return Ok(Vec::new());
        }
        let found: Vec<Option<RawToken>> = self
            .get_json("/mint/ids", &[("mints", mints.join(","))])
            .await?;
        Ok(found.into_iter().flatten().collect())
    }

    async fn account_owner(&self, address: &Pubkey) -> GatewayResult<Option<String>> {
        self.rpc.get_account_owner(address).await
    }

    async fn fetch_pool_list(&self, page: u32) -> GatewayResult<PoolPage> {
        let page: RaydiumPoolPage = self
            .get_json(
                "/pools/info/list",
                &[
                    ("poolType", "all".to_string()),
                    ("poolSortField", "default".to_string()),
                    ("sortType", "desc".to_string()),
                    ("pageSize", POOL_PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;
        Ok(page.into())
    }

    async fn fetch_pools_by_mints(&self, query: &PoolQuery) -> GatewayResult<PoolPage> {
        let mut params = vec![
            ("mint1", query.mint1.clone()),
            ("poolType", query.pool_type.as_str().to_string()),
            ("poolSortField", query.sort.as_str().to_string()),
            ("sortType", query.order.as_str().to_string()),
            ("pageSize", POOL_PAGE_SIZE.to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(mint2) = &query.mint2 {
            params.push(("mint2", mint2.clone()));
        }

        let page: RaydiumPoolPage = self.get_json("/pools/info/mint", &params).await?;
        Ok(page.into())
    }

    async fn latest_blockhash(&self) -> GatewayResult<String> {
        self.rpc.get_latest_blockhash().await
    }
}

/// Connector producing [`RaydiumClient`] sessions
#[derive(Debug, Default, Clone)]
pub struct RaydiumConnector;

#[async_trait]
impl ChainConnector for RaydiumConnector {
    async fn connect(&self, config: &ChainConfig) -> GatewayResult<Arc<dyn ChainClient>> {
        info!(
            "Connecting to Raydium API at {} with RPC {}",
            config.api_base_url(),
            config.rpc_url
        );
        if config.ws_url.is_some() {
            warn!("WebSocket endpoint configured but subscriptions are not used");
        }
        let client = RaydiumClient::load(config).await?;
        Ok(Arc::new(client))
    }
}
