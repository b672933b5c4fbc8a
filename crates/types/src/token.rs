//! Token types returned by the gateway

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Well-known mints
// ============================================================================

pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
pub const RAY_MINT: &str = "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R";

/// SPL token program that owns classic mint accounts
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Fallbacks used when the token list omits metadata
pub const UNKNOWN_SYMBOL: &str = "Unknown";
pub const UNKNOWN_NAME: &str = "Unknown Token";

// ============================================================================
// Token
// ============================================================================

/// A fungible asset known to the chain data source, normalized
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub logo_uri: Option<String>,
    pub tags: Vec<String>,
    pub extensions: Map<String, Value>,
}

/// Token plus on-chain account information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    #[serde(flatten)]
    pub token: Token,
    /// Whether the mint account exists on chain
    pub is_initialized: bool,
    /// Program owning the mint account
    pub program_id: Option<String>,
}

/// Compact token reference embedded in pools and farms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenRef {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl TokenRef {
    pub fn new(address: &str, symbol: &str, name: &str, decimals: u8) -> Self {
        Self {
            address: address.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
        }
    }
}

impl From<&Token> for TokenRef {
    fn from(token: &Token) -> Self {
        Self {
            address: token.address.clone(),
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            decimals: token.decimals,
        }
    }
}
