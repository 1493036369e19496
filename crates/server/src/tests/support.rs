use std::sync::atomic::{AtomicUsize, Ordering};

use alloy_primitives::U256;
use async_trait::async_trait;
use chain_client::{
    ChainClient, ChainError, ContractCall, LocalAccount, Simulation, TransactionRequest, TxHash,
};
use frame_hub::{FrameMessageVerifier, VerifyError};
use shared::protocol::{FrameActionPayload, FrameMessage};

pub const TEST_PRIVATE_KEY: &str =
    "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

#[derive(Debug, Clone, Copy)]
pub enum WriteBehavior {
    Succeed,
    OutOfGas,
    Fail,
}

pub struct FakeChain {
    behavior: WriteBehavior,
    simulations: AtomicUsize,
    writes: AtomicUsize,
}

impl FakeChain {
    pub fn new(behavior: WriteBehavior) -> Self {
        Self {
            behavior,
            simulations: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn hash() -> TxHash {
        TxHash::repeat_byte(0xab)
    }

    pub fn simulations(&self) -> usize {
        self.simulations.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn simulate_contract(
        &self,
        call: ContractCall,
        account: &LocalAccount,
    ) -> Result<Simulation, ChainError> {
        self.simulations.fetch_add(1, Ordering::SeqCst);
        Ok(Simulation {
            result: Vec::new(),
            request: TransactionRequest {
                account: account.clone(),
                to: call.address,
                data: call.calldata,
                value: U256::ZERO,
            },
        })
    }

    async fn write_contract(&self, _request: TransactionRequest) -> Result<TxHash, ChainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            WriteBehavior::Succeed => Ok(Self::hash()),
            WriteBehavior::OutOfGas => Err(ChainError::TransactionExecution {
                details: "gas required exceeds allowance (0)".into(),
            }),
            WriteBehavior::Fail => Err(ChainError::TransactionExecution {
                details: "nonce too low".into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum HubBehavior {
    Valid,
    Invalid,
    Unreachable,
}

pub struct FakeVerifier {
    pub behavior: HubBehavior,
}

#[async_trait]
impl FrameMessageVerifier for FakeVerifier {
    async fn verify(&self, payload: &FrameActionPayload) -> Result<FrameMessage, VerifyError> {
        match self.behavior {
            HubBehavior::Valid => Ok(FrameMessage {
                is_valid: true,
                fid: payload.untrusted_data.fid,
                button_index: payload.untrusted_data.button_index,
                input_text: None,
                cast_id: payload.untrusted_data.cast_id.clone(),
                timestamp: None,
            }),
            HubBehavior::Invalid => Ok(FrameMessage::invalid()),
            HubBehavior::Unreachable => Err(VerifyError::MissingMessageBytes),
        }
    }
}
