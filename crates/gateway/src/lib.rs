//! SwapDeck gateway
//!
//! Stateless HTTP facade between the SwapDeck dashboard and Solana chain
//! data. Every endpoint answers with the [`swapdeck_types::ApiResponse`]
//! envelope.

pub mod api;
pub mod chain;
pub mod config;

pub use chain::ChainAdapter;
pub use config::GatewayConfig;
