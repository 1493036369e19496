use alloy_primitives::{keccak256, Address, U256};

pub const MINT_SIGNATURE: &str = "mint(address,uint256)";

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for `mint(address to, uint256 amount)`.
pub fn encode_mint(recipient: Address, amount: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&selector(MINT_SIGNATURE));
    data.extend_from_slice(&address_word(recipient));
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data
}

fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}
