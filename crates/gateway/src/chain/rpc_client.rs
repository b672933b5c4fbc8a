//! Lightweight Solana RPC client
//!
//! Implements only the JSON-RPC methods the gateway needs, over the same
//! `reqwest` client the Raydium API client uses, instead of pulling in the
//! full solana-client networking stack.

use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use swapdeck_types::{GatewayError, GatewayResult};
use tracing::debug;

/// Lightweight RPC client for Solana
#[derive(Clone)]
pub struct LightRpcClient {
    url: String,
    http: reqwest::Client,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Result of `getAccountInfo` with `value` possibly null
#[derive(Debug, Deserialize)]
struct AccountInfoResult {
    value: Option<AccountInfo>,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    owner: String,
}

#[derive(Debug, Deserialize)]
struct BlockhashResult {
    value: BlockhashValue,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

impl LightRpcClient {
    pub fn with_http_client(url: String, http: reqwest::Client) -> Self {
        Self { url, http }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a JSON-RPC call
    async fn call<T>(&self, method: &str, params: Value) -> GatewayResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC call: {} with params: {}", method, params);

        let response = self
            .http
            .post(&self.url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GatewayError::upstream(format!("RPC {} request failed: {}", method, e)))?;

        let rpc_response: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::upstream(format!("RPC {} response invalid: {}", method, e)))?;

        if let Some(error) = rpc_response.error {
            return Err(GatewayError::upstream(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        rpc_response
            .result
            .ok_or_else(|| GatewayError::upstream(format!("No result in RPC {} response", method)))
    }

    /// Get the latest blockhash
    pub async fn get_latest_blockhash(&self) -> GatewayResult<String> {
        let result: BlockhashResult = self
            .call("getLatestBlockhash", json!([{ "commitment": "finalized" }]))
            .await?;
        Ok(result.value.blockhash)
    }

    /// Owner program of an account, `None` if the account does not exist
    pub async fn get_account_owner(&self, pubkey: &Pubkey) -> GatewayResult<Option<String>> {
        let params = json!([
            pubkey.to_string(),
            {
                "encoding": "base64",
                "commitment": "confirmed",
                "dataSlice": { "offset": 0, "length": 0 }
            }
        ]);

        let result: AccountInfoResult = self.call("getAccountInfo", params).await?;
        Ok(result.value.map(|account| account.owner))
    }
}
