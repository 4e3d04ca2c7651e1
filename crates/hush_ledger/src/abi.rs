//! Minimal ABI call-data encoding for the token contract's interface.
//!
//! Only static types appear in the contract's mutating surface (address and
//! uint256 arguments), so calls are built by hand: a 4-byte keccak selector
//! followed by 32-byte left-padded words.

use ethers::types::U256;
use ethers::utils::keccak256;

use crate::address::EvmAddress;
use crate::amount::TokenAmount;

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn push_address(buf: &mut Vec<u8>, address: &EvmAddress) {
    buf.extend_from_slice(&[0u8; 12]);
    buf.extend_from_slice(address.as_bytes());
}

fn push_uint256(buf: &mut Vec<u8>, value: U256) {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    buf.extend_from_slice(&word);
}

/// `balanceOf(address)` call data.
pub fn balance_of(holder: &EvmAddress) -> Vec<u8> {
    let mut data = selector("balanceOf(address)").to_vec();
    push_address(&mut data, holder);
    data
}

/// `mintReward(address,uint256)` call data.
pub fn mint_reward(recipient: &EvmAddress, amount: &TokenAmount) -> Vec<u8> {
    let mut data = selector("mintReward(address,uint256)").to_vec();
    push_address(&mut data, recipient);
    push_uint256(&mut data, amount.as_u256());
    data
}

/// `initialize(address)` call data, linking the manager to its token.
pub fn initialize(token: &EvmAddress) -> Vec<u8> {
    let mut data = selector("initialize(address)").to_vec();
    push_address(&mut data, token);
    data
}

/// Zero-argument view call data.
pub fn view_call(signature: &str) -> Vec<u8> {
    selector(signature).to_vec()
}

/// Decode a single uint256 return word. `None` when the return is short.
pub fn decode_uint256(ret: &[u8]) -> Option<U256> {
    if ret.len() < 32 {
        return None;
    }
    Some(U256::from_big_endian(&ret[..32]))
}

/// Decode an ABI-encoded string return (offset word, length word, data).
pub fn decode_string(ret: &[u8]) -> Option<String> {
    let offset = small_word(decode_uint256(ret)?)?;
    let len = small_word(U256::from_big_endian(ret.get(offset..offset + 32)?))?;
    let bytes = ret.get(offset + 32..offset + 32 + len)?;
    String::from_utf8(bytes.to_vec()).ok()
}

// Word values used as offsets/lengths are tiny in practice; anything that
// does not fit a u32 is a malformed return.
fn small_word(value: U256) -> Option<usize> {
    if value > U256::from(u32::MAX) {
        return None;
    }
    Some(value.as_u64() as usize)
}
