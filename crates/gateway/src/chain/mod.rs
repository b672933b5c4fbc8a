//! Access to on-chain data
//!
//! The [`ChainAdapter`] owns the single session against the data source and
//! is what the HTTP layer talks to. Sessions come from a [`ChainConnector`]:
//! [`RaydiumConnector`] for live data, [`FixtureConnector`] for the built-in
//! data set.

pub mod adapter;
pub mod client;
pub mod fixture;
pub mod placeholder;
pub mod raydium;
pub mod rpc_client;

pub use adapter::ChainAdapter;
pub use client::{ChainClient, ChainConnector, RawToken};
pub use fixture::{FixtureClient, FixtureConnector};
pub use raydium::{RaydiumClient, RaydiumConnector};
pub use rpc_client::LightRpcClient;

use std::sync::Arc;

use crate::config::{ChainConfig, DataSource};

/// Connector for the configured data source
pub fn connector_for(config: &ChainConfig) -> Arc<dyn ChainConnector> {
    match config.data_source {
        DataSource::Live => Arc::new(RaydiumConnector),
        DataSource::Fixture => Arc::new(FixtureConnector::new()),
    }
}
