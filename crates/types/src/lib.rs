//! Shared types for the SwapDeck gateway
//!
//! This crate provides the response envelope, the tagged error taxonomy and
//! the DTOs exchanged between the chain adapter and the HTTP handlers.

pub mod envelope;
pub mod errors;
pub mod farm;
pub mod pool;
pub mod swap;
pub mod token;
pub mod wallet;

// Re-export all public types
pub use envelope::*;
pub use errors::*;
pub use farm::*;
pub use pool::*;
pub use swap::*;
pub use token::*;
pub use wallet::*;
