//! Swap quote and unsigned transaction bundle types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{GatewayError, GatewayResult};

/// Slippage applied when the client does not send one, in percent
pub const DEFAULT_SLIPPAGE_PERCENT: &str = "0.5";

/// Compute-unit estimate reported alongside quotes and bundles
pub const GAS_ESTIMATE: &str = "150000";

/// Estimated outcome of a hypothetical swap.
///
/// The numbers are a best-effort estimate from the pool snapshot the data
/// source returned, not an exact AMM computation. Their precision depends
/// entirely on how fresh that snapshot is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub input_mint: String,
    pub output_mint: String,
    /// Input amount as supplied, in UI units
    pub input_amount: String,
    /// Input amount scaled by the input token's decimals
    pub input_amount_raw: String,
    /// Estimated output, in UI units of the output token
    pub output_amount: String,
    /// Estimated price impact in percent
    pub price_impact: String,
    /// Pool fee in percent
    pub fee: String,
    /// Slippage tolerance in percent
    pub slippage: String,
    pub slippage_bps: u16,
    pub pool_id: String,
    /// Ordered mints the swap passes through
    pub route: Vec<String>,
}

/// Placeholder for an instruction the bundle would contain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedInstruction {
    pub program_id: String,
    pub name: String,
    pub accounts: Vec<String>,
}

/// Unsigned swap transaction artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransactionBundle {
    pub input_mint: String,
    pub output_mint: String,
    pub amount_in: String,
    pub amount_in_raw: String,
    pub slippage_bps: u16,
    pub user_public_key: String,
    pub pool_id: String,
    pub recent_blockhash: String,
    pub instructions: Vec<PlannedInstruction>,
    pub ext_info: Map<String, Value>,
}

impl SwapTransactionBundle {
    /// Sign and submit the bundle. Execution is deliberately unsupported;
    /// callers must not treat this error as transient.
    pub fn execute(&self) -> GatewayResult<String> {
        Err(GatewayError::NotImplemented("Swap execution".to_string()))
    }
}

/// Convert a percentage slippage (e.g. 0.5) into basis points
pub fn slippage_to_bps(percent: f64) -> u16 {
    (percent * 100.0).round().clamp(0.0, u16::MAX as f64) as u16
}

/// Lower bound on output after applying percentage slippage
pub fn minimum_amount_out(output_amount: f64, slippage_percent: f64) -> f64 {
    output_amount * (1.0 - slippage_percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slippage_to_bps() {
        assert_eq!(slippage_to_bps(0.5), 50);
        assert_eq!(slippage_to_bps(1.0), 100);
        assert_eq!(slippage_to_bps(0.125), 13);
        assert_eq!(slippage_to_bps(-3.0), 0);
    }

    #[test]
    fn test_minimum_amount_out() {
        let min = minimum_amount_out(200.0, 0.5);
        assert!((min - 199.0).abs() < 1e-9);
    }

    #[test]
    fn test_execute_is_not_implemented() {
        let bundle = SwapTransactionBundle {
            input_mint: "A".to_string(),
            output_mint: "B".to_string(),
            amount_in: "1".to_string(),
            amount_in_raw: "1000000000".to_string(),
            slippage_bps: 50,
            user_public_key: "user".to_string(),
            pool_id: "pool".to_string(),
            recent_blockhash: "hash".to_string(),
            instructions: vec![],
            ext_info: Map::new(),
        };

        let err = bundle.execute().unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::NotImplemented);
        assert_eq!(err.to_string(), "Swap execution is not implemented");
    }
}
