//! Configuration management for the SwapDeck gateway

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Environment variables read by [`GatewayConfig::apply_env_overrides`]
pub const ENV_RPC_URL: &str = "SOLANA_RPC_URL";
pub const ENV_WS_URL: &str = "SOLANA_WS_URL";
pub const ENV_CLUSTER: &str = "SOLANA_CLUSTER";
pub const ENV_API_URL: &str = "RAYDIUM_API_URL";
pub const ENV_DATA_SOURCE: &str = "SWAPDECK_DATA_SOURCE";
pub const ENV_BIND_ADDRESS: &str = "SWAPDECK_BIND_ADDRESS";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct GatewayConfig {
    #[validate]
    pub chain: ChainConfig,
    #[validate]
    pub api: ApiConfig,
    pub monitoring: MonitoringConfig,
}

// ============================================================================
// Chain
// ============================================================================

/// Solana cluster the gateway reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    MainnetBeta,
    Devnet,
    Testnet,
}

impl Cluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
        }
    }

    /// Raydium API host for the cluster. Raydium runs no testnet host, so
    /// testnet shares the devnet one.
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api-v3.raydium.io",
            Cluster::Devnet | Cluster::Testnet => "https://api-v3-devnet.raydium.io",
        }
    }
}

impl FromStr for Cluster {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            other => Err(anyhow!("Unknown cluster: {}", other)),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where chain data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Raydium API plus Solana RPC
    #[default]
    Live,
    /// Built-in deterministic token and pool set
    Fixture,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Fixture => "fixture",
        }
    }
}

impl FromStr for DataSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "live" => Ok(DataSource::Live),
            "fixture" => Ok(DataSource::Fixture),
            other => Err(anyhow!("Unknown data source: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChainConfig {
    #[validate(url)]
    pub rpc_url: String,
    #[validate(url)]
    pub ws_url: Option<String>,
    pub cluster: Cluster,
    /// Overrides the cluster's Raydium API host
    #[validate(url)]
    pub api_url: Option<String>,
    pub data_source: DataSource,
    #[validate(range(min = 1, max = 120))]
    pub request_timeout_secs: u64,
}

impl ChainConfig {
    pub fn api_base_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.cluster.default_api_url())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: Cluster::MainnetBeta.default_rpc_url().to_string(),
            ws_url: None,
            cluster: Cluster::MainnetBeta,
            api_url: None,
            data_source: DataSource::Live,
            request_timeout_secs: 15,
        }
    }
}

// ============================================================================
// API and monitoring
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: String,
    pub enable_cors: bool,
    #[validate(range(min = 1, max = 100))]
    pub max_request_size_mb: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            enable_cors: true,
            max_request_size_mb: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. A cluster override also resets
    /// the RPC URL to that cluster's default unless the URL is overridden too.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cluster) = lookup(ENV_CLUSTER) {
            self.chain.cluster = cluster.parse()?;
            self.chain.rpc_url = self.chain.cluster.default_rpc_url().to_string();
        }
        if let Some(rpc_url) = lookup(ENV_RPC_URL) {
            self.chain.rpc_url = rpc_url;
        }
        if let Some(ws_url) = lookup(ENV_WS_URL) {
            self.chain.ws_url = Some(ws_url);
        }
        if let Some(api_url) = lookup(ENV_API_URL) {
            self.chain.api_url = Some(api_url);
        }
        if let Some(source) = lookup(ENV_DATA_SOURCE) {
            self.chain.data_source = source.parse()?;
        }
        if let Some(bind_address) = lookup(ENV_BIND_ADDRESS) {
            self.api.bind_address = bind_address;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.api.bind_address.is_empty() {
            return Err(anyhow!("Bind address cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.chain.api_base_url(), "https://api-v3.raydium.io");
        assert_eq!(config.chain.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("mainnet".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert!("localnet".parse::<Cluster>().is_err());
        assert_eq!(Cluster::Testnet.default_api_url(), Cluster::Devnet.default_api_url());
    }
}
