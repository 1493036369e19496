use alloy_primitives::{hex, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ChainError;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 over HTTP POST, one call per request.
#[derive(Debug, Clone)]
pub(crate) struct RpcTransport {
    http: reqwest::Client,
    url: String,
}

impl RpcTransport {
    pub(crate) fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub(crate) async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        let response = self.http.post(&self.url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let response: RpcResponse = serde_json::from_str(&text).map_err(|_| {
            ChainError::InvalidResponse(format!("{method} answered {status}: {text}"))
        })?;

        if let Some(error) = response.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| ChainError::InvalidResponse(format!("{method} returned no result")))
    }
}

fn as_str<'a>(value: &'a Value, what: &str) -> Result<&'a str, ChainError> {
    value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("{what} is not a string: {value}")))
}

pub(crate) fn parse_quantity(value: &Value) -> Result<U256, ChainError> {
    let raw = as_str(value, "quantity")?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("bad quantity {raw}: {e}")))
}

pub(crate) fn parse_u64(value: &Value) -> Result<u64, ChainError> {
    let raw = as_str(value, "quantity")?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("bad quantity {raw}: {e}")))
}

pub(crate) fn parse_data(value: &Value) -> Result<Vec<u8>, ChainError> {
    let raw = as_str(value, "data")?;
    hex::decode(raw).map_err(|e| ChainError::InvalidResponse(format!("bad data {raw}: {e}")))
}
