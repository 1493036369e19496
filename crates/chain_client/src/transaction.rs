use alloy_primitives::{keccak256, Address, B256, U256};

use crate::{
    rlp::{encode_bytes, encode_list, encode_u64, encode_uint, trim_leading_zeros},
    ChainError, LocalAccount,
};

/// Pre-EIP-1559 transaction, replay protected with EIP-155.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

impl LegacyTransaction {
    fn common_fields(&self) -> Vec<Vec<u8>> {
        vec![
            encode_u64(self.nonce),
            encode_uint(self.gas_price),
            encode_uint(self.gas_limit),
            encode_bytes(self.to.as_slice()),
            encode_uint(self.value),
            encode_bytes(&self.data),
        ]
    }

    pub fn signing_hash(&self) -> B256 {
        let mut fields = self.common_fields();
        fields.push(encode_u64(self.chain_id));
        fields.push(encode_u64(0));
        fields.push(encode_u64(0));
        keccak256(encode_list(&fields))
    }

    /// Returns the raw bytes for `eth_sendRawTransaction`.
    pub fn sign(&self, account: &LocalAccount) -> Result<Vec<u8>, ChainError> {
        let hash = self.signing_hash();
        let (signature, recovery_id) = account
            .signing_key()
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|e| ChainError::Signing(e.to_string()))?;
        let v = self
            .chain_id
            .checked_mul(2)
            .and_then(|v| v.checked_add(35 + u64::from(recovery_id.to_byte())))
            .ok_or_else(|| ChainError::Signing(format!("chain id {} is too large", self.chain_id)))?;
        let bytes = signature.to_bytes();
        let (r, s) = bytes.split_at(32);

        let mut fields = self.common_fields();
        fields.push(encode_u64(v));
        fields.push(encode_bytes(trim_leading_zeros(r)));
        fields.push(encode_bytes(trim_leading_zeros(s)));
        Ok(encode_list(&fields))
    }
}
