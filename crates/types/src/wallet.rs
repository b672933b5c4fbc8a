//! Wallet-facing types: token accounts and portfolio summaries

use serde::{Deserialize, Serialize};

/// Balance of one mint held by a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountEntry {
    pub mint: String,
    pub symbol: String,
    pub balance: String,
    pub decimals: u8,
    pub ui_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTokenAccounts {
    pub accounts: Vec<TokenAccountEntry>,
    pub total_value: String,
    pub last_updated: String,
    /// Set when the accounts are demo data rather than a live wallet read
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueChange {
    pub value: String,
    pub percentage: String,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioToken {
    pub symbol: String,
    pub name: String,
    pub balance: String,
    pub value: String,
    pub price: String,
    pub change_24h: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPosition {
    pub pool_name: String,
    pub token0: String,
    pub token1: String,
    pub liquidity: String,
    pub value: String,
    pub apy: String,
    pub share: String,
}

/// Portfolio split by category, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub tokens: f64,
    pub liquidity: f64,
    pub farming: f64,
    pub staking: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub wallet_address: String,
    pub total_value: String,
    pub change_24h: ValueChange,
    pub tokens: Vec<PortfolioToken>,
    pub pool_positions: Vec<PoolPosition>,
    pub allocation: Allocation,
    pub warning: Option<String>,
}
