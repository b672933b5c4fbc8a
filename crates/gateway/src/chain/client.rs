//! Chain client abstractions
//!
//! `ChainClient` is the session the external data source hands out once it is
//! connected; `ChainConnector` knows how to build one. The adapter only talks
//! to these traits, so tests and the fixture mode swap in other
//! implementations without touching handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use solana_sdk::pubkey::Pubkey;
use swapdeck_types::{GatewayResult, PoolPage, PoolQuery};

use crate::config::ChainConfig;

/// Token record as the data source publishes it. Metadata fields are
/// optional because token lists are frequently incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToken {
    pub address: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub decimals: u8,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    pub tags: Option<Vec<String>>,
    pub extensions: Option<Map<String, Value>>,
}

/// Connected session against the external chain data source
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Token map loaded when the session was created, keyed by mint
    fn token_map(&self) -> &HashMap<String, RawToken>;

    /// Secondary lookup for mints missing from the token map
    async fn lookup_tokens(&self, mints: &[String]) -> GatewayResult<Vec<RawToken>>;

    /// Owner program of an on-chain account, `None` when the account does
    /// not exist
    async fn account_owner(&self, address: &Pubkey) -> GatewayResult<Option<String>>;

    /// One page of the general pool list
    async fn fetch_pool_list(&self, page: u32) -> GatewayResult<PoolPage>;

    /// Pools trading the queried mints
    async fn fetch_pools_by_mints(&self, query: &PoolQuery) -> GatewayResult<PoolPage>;

    /// Blockhash to reference from unsigned transactions
    async fn latest_blockhash(&self) -> GatewayResult<String>;
}

impl std::fmt::Debug for dyn ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient").finish_non_exhaustive()
    }
}

/// Factory for [`ChainClient`] sessions
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, config: &ChainConfig) -> GatewayResult<Arc<dyn ChainClient>>;
}
