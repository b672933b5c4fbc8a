//! Fixture-backed chain client
//!
//! A deterministic token and pool set served from memory. Used by
//! `--data-source fixture` for offline demos and by the test suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Map;
use solana_sdk::pubkey::Pubkey;
use swapdeck_types::{
    GatewayError, GatewayResult, Pool, PoolDayStats, PoolPage, PoolQuery, PoolType, SortOrder,
    TokenRef, POOL_PAGE_SIZE, RAY_MINT, SOL_MINT, TOKEN_PROGRAM_ID, USDC_MINT, USDT_MINT,
};
use tracing::info;

use super::client::{ChainClient, ChainConnector, RawToken};
use crate::config::ChainConfig;

pub const MSOL_MINT: &str = "mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So";
pub const BONK_MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

const AMM_V4_PROGRAM: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
const CLMM_PROGRAM: &str = "CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK";
const FIXTURE_BLOCKHASH: &str = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N";

/// In-memory chain client
pub struct FixtureClient {
    tokens: HashMap<String, RawToken>,
    /// Tokens only reachable through the secondary lookup
    extra_tokens: HashMap<String, RawToken>,
    pools: Vec<Pool>,
    /// Delay applied to pool queries
    query_latency: Option<Duration>,
}

impl FixtureClient {
    pub fn new() -> Self {
        let tokens = [
            raw_token(SOL_MINT, Some("SOL"), Some("Wrapped SOL"), 9),
            raw_token(USDC_MINT, Some("USDC"), Some("USD Coin"), 6),
            raw_token(USDT_MINT, Some("USDT"), Some("USDT"), 6),
            raw_token(RAY_MINT, Some("RAY"), Some("Raydium"), 6),
            // Listed without metadata
            raw_token(MSOL_MINT, None, None, 9),
        ];
        let extra = [raw_token(BONK_MINT, Some("Bonk"), Some("Bonk"), 5)];

        Self {
            tokens: tokens.into_iter().map(|t| (t.address.clone(), t)).collect(),
            extra_tokens: extra.into_iter().map(|t| (t.address.clone(), t)).collect(),
            pools: fixture_pools(),
            query_latency: None,
        }
    }

    /// Delay every pool query
    pub fn with_query_latency(mut self, latency: Duration) -> Self {
        self.query_latency = Some(latency);
        self
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.query_latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for FixtureClient {
    fn default() -> Self {
        Self::new()
    }
}

fn raw_token(address: &str, symbol: Option<&str>, name: Option<&str>, decimals: u8) -> RawToken {
    RawToken {
        address: address.to_string(),
        symbol: symbol.map(str::to_string),
        name: name.map(str::to_string),
        decimals,
        logo_uri: symbol.map(|_| format!("https://img-v1.raydium.io/icon/{}.png", address)),
        tags: symbol.map(|_| Vec::new()),
        extensions: symbol.map(|_| Map::new()),
    }
}

#[allow(clippy::too_many_arguments)]
fn pool(
    id: &str,
    pool_type: PoolType,
    mint_a: TokenRef,
    mint_b: TokenRef,
    price: f64,
    reserves: (f64, f64),
    fee_rate: f64,
    tvl: f64,
    day: PoolDayStats,
) -> Pool {
    let (program_id, lp_mint) = match pool_type {
        PoolType::Standard => (AMM_V4_PROGRAM, Some(format!("lp-{}", id))),
        PoolType::Concentrated => (CLMM_PROGRAM, None),
    };
    Pool {
        id: id.to_string(),
        pool_type,
        program_id: program_id.to_string(),
        mint_a,
        mint_b,
        lp_mint,
        price,
        mint_amount_a: reserves.0,
        mint_amount_b: reserves.1,
        fee_rate,
        tvl,
        day,
    }
}

fn fixture_pools() -> Vec<Pool> {
    let sol = || TokenRef::new(SOL_MINT, "SOL", "Wrapped SOL", 9);
    let usdc = || TokenRef::new(USDC_MINT, "USDC", "USD Coin", 6);
    let ray = || TokenRef::new(RAY_MINT, "RAY", "Raydium", 6);

    vec![
        pool(
            "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2",
            PoolType::Standard,
            sol(),
            usdc(),
            150.0,
            (50_000.0, 7_500_000.0),
            0.0025,
            15_000_000.0,
            PoolDayStats { volume: 20_000_000.0, volume_fee: 50_000.0, apr: 12.5 },
        ),
        pool(
            "3ucNos4NbumPLZNWztqGHNFFgkHeRMBQAVemeeomsUxv",
            PoolType::Concentrated,
            sol(),
            usdc(),
            150.2,
            (30_000.0, 4_506_000.0),
            0.0004,
            9_000_000.0,
            PoolDayStats { volume: 80_000_000.0, volume_fee: 32_000.0, apr: 40.0 },
        ),
        pool(
            "2AXXcN6oN9bBT5owwmTH53C7QHUXvhLeu718Kqt8rvY2",
            PoolType::Concentrated,
            ray(),
            sol(),
            0.02,
            (1_000_000.0, 20_000.0),
            0.0025,
            6_000_000.0,
            PoolDayStats { volume: 3_000_000.0, volume_fee: 7_500.0, apr: 22.0 },
        ),
        pool(
            "6UmmUiYoBjSrhakAobJw8BvkmJtDVxaeBtbt7rxWo1mg",
            PoolType::Standard,
            ray(),
            usdc(),
            3.0,
            (2_000_000.0, 6_000_000.0),
            0.0025,
            12_000_000.0,
            PoolDayStats { volume: 1_000_000.0, volume_fee: 2_500.0, apr: 8.1 },
        ),
    ]
}

fn paginate(mut pools: Vec<Pool>, page: u32) -> PoolPage {
    let count = pools.len() as u64;
    let start = (page.max(1) as usize - 1) * POOL_PAGE_SIZE;
    let data: Vec<Pool> = if start >= pools.len() {
        Vec::new()
    } else {
        pools.drain(start..).take(POOL_PAGE_SIZE).collect()
    };
    PoolPage {
        count,
        has_next_page: (start + data.len()) < count as usize,
        data,
    }
}

#[async_trait]
impl ChainClient for FixtureClient {
    fn token_map(&self) -> &HashMap<String, RawToken> {
        &self.tokens
    }

    async fn lookup_tokens(&self, mints: &[String]) -> GatewayResult<Vec<RawToken>> {
        Ok(mints
            .iter()
            .filter_map(|mint| self.extra_tokens.get(mint).cloned())
            .collect())
    }

    async fn account_owner(&self, address: &Pubkey) -> GatewayResult<Option<String>> {
        let address = address.to_string();
        let known = self.tokens.contains_key(&address) || self.extra_tokens.contains_key(&address);
        Ok(known.then(|| TOKEN_PROGRAM_ID.to_string()))
    }

    async fn fetch_pool_list(&self, page: u32) -> GatewayResult<PoolPage> {
        self.simulate_latency().await;
        Ok(paginate(self.pools.clone(), page))
    }

    async fn fetch_pools_by_mints(&self, query: &PoolQuery) -> GatewayResult<PoolPage> {
        self.simulate_latency().await;
        let mut matched: Vec<Pool> = self
            .pools
            .iter()
            .filter(|pool| query.matches(pool))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = a
                .sort_value(query.sort)
                .partial_cmp(&b.sort_value(query.sort))
                .unwrap_or(std::cmp::Ordering::Equal);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(paginate(matched, query.page))
    }

    async fn latest_blockhash(&self) -> GatewayResult<String> {
        Ok(FIXTURE_BLOCKHASH.to_string())
    }
}

/// Connector handing out [`FixtureClient`] sessions.
///
/// Counts connection attempts and can be told to fail a number of times or
/// to take a while, which makes initialization behaviour observable.
#[derive(Default)]
pub struct FixtureConnector {
    attempts: AtomicUsize,
    connections: AtomicUsize,
    failures_remaining: AtomicUsize,
    latency: Option<Duration>,
    query_latency: Option<Duration>,
}

impl FixtureConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` connection attempts
    pub fn with_failures(self, count: usize) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Delay every connection attempt
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Hand out sessions whose pool queries take `latency`
    pub fn with_query_latency(mut self, latency: Duration) -> Self {
        self.query_latency = Some(latency);
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Sessions successfully constructed
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainConnector for FixtureConnector {
    async fn connect(&self, config: &ChainConfig) -> GatewayResult<Arc<dyn ChainClient>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(GatewayError::AdapterInit(
                "fixture connector configured to fail".to_string(),
            ));
        }

        self.connections.fetch_add(1, Ordering::SeqCst);
        info!("Using fixture chain data for cluster {}", config.cluster);
        let client = match self.query_latency {
            Some(latency) => FixtureClient::new().with_query_latency(latency),
            None => FixtureClient::new(),
        };
        Ok(Arc::new(client))
    }
}
