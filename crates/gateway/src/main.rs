//! SwapDeck Gateway
//!
//! HTTP facade serving token, pool, farm and swap data from Solana to the
//! SwapDeck dashboard.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use swapdeck_gateway::api;
use swapdeck_gateway::chain::{self, ChainAdapter};
use swapdeck_gateway::config::{DataSource, GatewayConfig};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "swapdeck-gateway")]
#[command(about = "Chain-data facade for the SwapDeck dashboard")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "gateway.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Override the data source (live or fixture)
    #[arg(long)]
    data_source: Option<DataSource>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is not up yet, so the missing-file notice is deferred
    let config_found = std::path::Path::new(&cli.config).exists();
    let mut config = if config_found {
        GatewayConfig::from_file(&cli.config)?
    } else {
        GatewayConfig::default()
    };

    config.apply_env_overrides()?;
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }
    if let Some(data_source) = cli.data_source {
        config.chain.data_source = data_source;
    }

    init_logging(&config)?;

    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting SwapDeck Gateway");
    info!("Cluster: {}", config.chain.cluster);
    info!("RPC endpoint: {}", config.chain.rpc_url);
    info!("Data source: {}", config.chain.data_source.as_str());

    config.check()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    // The chain client connects on the first request
    let connector = chain::connector_for(&config.chain);
    let adapter = Arc::new(ChainAdapter::new(config.chain.clone(), connector));

    info!("Starting API server on {}", config.api.bind_address);
    let api_server = api::start_server(adapter, &config.api).await?;

    info!("Gateway started successfully. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = api_server => {
            match result {
                Ok(_) => info!("API server finished"),
                Err(e) => error!("API server task error: {}", e),
            }
        }
    }

    info!("Shutting down SwapDeck Gateway");
    Ok(())
}

fn init_logging(config: &GatewayConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("swapdeck_gateway={},tower_http=info", log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    Ok(())
}
