use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Literal message for token lookups that miss the token map and the
/// secondary lookup. Clients match on it, so it never changes.
pub const TOKEN_NOT_FOUND_MESSAGE: &str = "Token not found";

// ============================================================================
// Error Kinds
// ============================================================================

/// Tag carried by every gateway error. The transport layer maps kinds to
/// status codes in one place instead of matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    MethodNotAllowed,
    NoPoolsFound,
    AdapterInit,
    NotImplemented,
    Timeout,
    Upstream,
    Internal,
}

// ============================================================================
// Main Error Enum
// ============================================================================

/// Error type shared by the chain adapter and the HTTP handlers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Missing or malformed request field
    #[error("{0}")]
    InvalidArgument(String),

    /// Token absent from the token map and the secondary lookup
    #[error("Token not found")]
    TokenNotFound { address: String },

    /// Any other missing resource
    #[error("{0}")]
    NotFound(String),

    /// Route exists but not for this HTTP method
    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// No liquidity pool exists for the requested pair
    #[error("No pools found for mint pair {mint1}/{}", .mint2.as_deref().unwrap_or("*"))]
    NoPoolsFound { mint1: String, mint2: Option<String> },

    /// The chain client could not be constructed
    #[error("Chain client initialization failed: {0}")]
    AdapterInit(String),

    /// Capability intentionally left unimplemented
    #[error("{0} is not implemented")]
    NotImplemented(String),

    /// External call exceeded the configured deadline
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The external API or RPC node returned an error
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        GatewayError::InvalidArgument(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        GatewayError::Upstream(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            GatewayError::TokenNotFound { .. } | GatewayError::NotFound(_) => ErrorKind::NotFound,
            GatewayError::MethodNotAllowed { .. } => ErrorKind::MethodNotAllowed,
            GatewayError::NoPoolsFound { .. } => ErrorKind::NoPoolsFound,
            GatewayError::AdapterInit(_) => ErrorKind::AdapterInit,
            GatewayError::NotImplemented(_) => ErrorKind::NotImplemented,
            GatewayError::Timeout(_) => ErrorKind::Timeout,
            GatewayError::Upstream(_) => ErrorKind::Upstream,
            GatewayError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to API clients. Upstream and internal details
    /// stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Upstream(_) => "Upstream data source error".to_string(),
            GatewayError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Internal(format!("serialization: {}", err))
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
