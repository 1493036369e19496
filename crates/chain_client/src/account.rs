use std::fmt;

use alloy_primitives::{hex, keccak256, Address};
use k256::ecdsa::SigningKey;

use crate::ChainError;

/// A private key held in process, plus the address it controls.
#[derive(Clone)]
pub struct LocalAccount {
    signing_key: SigningKey,
    address: Address,
}

impl LocalAccount {
    pub fn from_private_key(raw: &str) -> Result<Self, ChainError> {
        let bytes = hex::decode(raw.trim()).map_err(|e| ChainError::InvalidKey(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(ChainError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let signing_key =
            SigningKey::from_slice(&bytes).map_err(|e| ChainError::InvalidKey(e.to_string()))?;
        Ok(Self::from_signing_key(signing_key))
    }

    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let point = signing_key.verifying_key().to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        let address = Address::from_slice(&hash[12..]);
        Self {
            signing_key,
            address,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
