//! Ethereum JSON-RPC client for simulating and sending contract calls with a
//! locally held key.

mod abi;
mod account;
mod rlp;
mod rpc;
mod transaction;

use std::str::FromStr;

use alloy_primitives::{hex, Address, B256, U256};
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

pub use abi::{encode_mint, selector, MINT_SIGNATURE};
pub use account::LocalAccount;
pub use transaction::LegacyTransaction;

use rpc::{parse_data, parse_quantity, parse_u64, RpcTransport};

pub type TxHash = B256;

pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_SEPOLIA_RPC_URL: &str = "https://rpc.sepolia.org";

/// Node message for a sender that cannot pay for the gas it needs.
pub const GAS_EXHAUSTED_PREFIX: &str = "gas required exceeds allowance";

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    #[error("rpc transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("invalid rpc response: {0}")]
    InvalidResponse(String),
    #[error("contract function execution failed: {details}")]
    ContractExecution { details: String },
    #[error("transaction execution failed: {details}")]
    TransactionExecution { details: String },
    #[error("signing failed: {0}")]
    Signing(String),
}

impl ChainError {
    pub fn is_gas_exhausted(&self) -> bool {
        matches!(
            self,
            Self::TransactionExecution { details } if details.starts_with(GAS_EXHAUSTED_PREFIX)
        )
    }

    fn during_simulation(self) -> Self {
        match self {
            Self::Rpc { message, .. } => Self::ContractExecution { details: message },
            other => other,
        }
    }

    fn during_transaction(self) -> Self {
        match self {
            Self::Rpc { message, .. } => Self::TransactionExecution { details: message },
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub address: Address,
    pub calldata: Vec<u8>,
}

impl ContractCall {
    pub fn mint(token: Address, recipient: Address, amount: U256) -> Self {
        Self {
            address: token,
            calldata: encode_mint(recipient, amount),
        }
    }
}

/// A simulated call, ready to be signed and sent.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub account: LocalAccount,
    pub to: Address,
    pub data: Vec<u8>,
    pub value: U256,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    pub result: Vec<u8>,
    pub request: TransactionRequest,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn simulate_contract(
        &self,
        call: ContractCall,
        account: &LocalAccount,
    ) -> Result<Simulation, ChainError>;

    async fn write_contract(&self, request: TransactionRequest) -> Result<TxHash, ChainError>;
}

#[derive(Debug, Clone)]
pub struct RpcChainClient {
    transport: RpcTransport,
    chain_id: u64,
}

impl RpcChainClient {
    pub fn new(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self::with_client(reqwest::Client::new(), rpc_url, chain_id)
    }

    pub fn with_client(http: reqwest::Client, rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            transport: RpcTransport::new(http, rpc_url),
            chain_id,
        }
    }

    async fn prepare(&self, request: &TransactionRequest) -> Result<LegacyTransaction, ChainError> {
        let from = request.account.address();
        let gas_limit = parse_quantity(
            &self
                .transport
                .request(
                    "eth_estimateGas",
                    json!([{
                        "from": from.to_string(),
                        "to": request.to.to_string(),
                        "data": hex::encode_prefixed(&request.data),
                        "value": format!("{:#x}", request.value),
                    }]),
                )
                .await?,
        )?;
        let nonce = parse_u64(
            &self
                .transport
                .request(
                    "eth_getTransactionCount",
                    json!([from.to_string(), "pending"]),
                )
                .await?,
        )?;
        let gas_price = parse_quantity(&self.transport.request("eth_gasPrice", json!([])).await?)?;

        Ok(LegacyTransaction {
            nonce,
            gas_price,
            gas_limit,
            to: request.to,
            value: request.value,
            data: request.data.clone(),
            chain_id: self.chain_id,
        })
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn simulate_contract(
        &self,
        call: ContractCall,
        account: &LocalAccount,
    ) -> Result<Simulation, ChainError> {
        let result = self
            .transport
            .request(
                "eth_call",
                json!([
                    {
                        "from": account.address().to_string(),
                        "to": call.address.to_string(),
                        "data": hex::encode_prefixed(&call.calldata),
                    },
                    "latest"
                ]),
            )
            .await
            .map_err(ChainError::during_simulation)?;
        let result = parse_data(&result)?;
        debug!(to = %call.address, from = %account.address(), "contract call simulated");

        Ok(Simulation {
            result,
            request: TransactionRequest {
                account: account.clone(),
                to: call.address,
                data: call.calldata,
                value: U256::ZERO,
            },
        })
    }

    async fn write_contract(&self, request: TransactionRequest) -> Result<TxHash, ChainError> {
        let transaction = self
            .prepare(&request)
            .await
            .map_err(ChainError::during_transaction)?;
        let raw = transaction.sign(&request.account)?;

        let hash = self
            .transport
            .request(
                "eth_sendRawTransaction",
                json!([hex::encode_prefixed(raw)]),
            )
            .await
            .map_err(ChainError::during_transaction)?;
        let hash = hash
            .as_str()
            .ok_or_else(|| ChainError::InvalidResponse(format!("bad transaction hash: {hash}")))?;
        TxHash::from_str(hash)
            .map_err(|e| ChainError::InvalidResponse(format!("bad transaction hash {hash}: {e}")))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
