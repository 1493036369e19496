use std::{fmt, str::FromStr};

use alloy_primitives::{Address, U256};
use anyhow::Context;
use chain_client::{ChainClient, ChainError, ContractCall, LocalAccount, TxHash};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;

#[derive(Clone)]
pub struct MintSettings {
    pub token: Address,
    pub recipient: Address,
    pub amount: U256,
    pub private_key: Option<String>,
}

impl MintSettings {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            token: Address::from_str(&settings.token_address)
                .with_context(|| format!("invalid token address '{}'", settings.token_address))?,
            recipient: Address::from_str(&settings.mint_recipient).with_context(|| {
                format!("invalid mint recipient '{}'", settings.mint_recipient)
            })?,
            amount: U256::from(settings.mint_amount),
            private_key: settings.minter_private_key.clone(),
        })
    }
}

impl fmt::Debug for MintSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintSettings")
            .field("token", &self.token)
            .field("recipient", &self.recipient)
            .field("amount", &self.amount)
            .field("has_private_key", &self.private_key.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    Submitted(TxHash),
    /// The minter cannot pay for gas; the caller shows the remedial frame.
    GasExhausted,
    /// Any other failure. Logged only, the caller renders as usual.
    Swallowed,
}

#[derive(Debug, Error)]
enum MintError {
    #[error("MINTER_PRIVATE_KEY is not set")]
    MissingKey,
    #[error(transparent)]
    Chain(#[from] ChainError),
}

pub async fn mint_pulpa(chain: &dyn ChainClient, settings: &MintSettings) -> MintOutcome {
    match try_mint(chain, settings).await {
        Ok(hash) => {
            debug!(%hash, recipient = %settings.recipient, "mint transaction sent");
            MintOutcome::Submitted(hash)
        }
        Err(MintError::Chain(error)) if error.is_gas_exhausted() => {
            warn!(%error, "minter ran out of gas");
            MintOutcome::GasExhausted
        }
        Err(error) => {
            warn!(%error, "pulpa mint failed");
            MintOutcome::Swallowed
        }
    }
}

async fn try_mint(chain: &dyn ChainClient, settings: &MintSettings) -> Result<TxHash, MintError> {
    let private_key = settings.private_key.as_deref().ok_or(MintError::MissingKey)?;
    let account = LocalAccount::from_private_key(private_key)?;

    let call = ContractCall::mint(settings.token, settings.recipient, settings.amount);
    let simulation = chain.simulate_contract(call, &account).await?;
    let hash = chain.write_contract(simulation.request).await?;
    Ok(hash)
}

#[cfg(test)]
#[path = "tests/mint_tests.rs"]
mod tests;
