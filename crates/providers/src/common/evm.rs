//! EVM calldata and gas constants

use xswap_types::{Amount, ProviderError, ProviderResult, SwapError};

/// `approve(address,uint256)`
const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

pub const APPROVAL_GAS: u64 = 60_000;
pub const DEFAULT_SWAP_GAS: u64 = 250_000;
pub const DEFAULT_BRIDGE_GAS: u64 = 200_000;

fn word_from_bytes(bytes: &[u8]) -> ProviderResult<[u8; 32]> {
	if bytes.len() > 32 {
		return Err(ProviderError::Swap(SwapError::internal(
			"Value does not fit in a 256-bit word",
		)));
	}
	let mut word = [0u8; 32];
	word[32 - bytes.len()..].copy_from_slice(bytes);
	Ok(word)
}

fn address_word(address: &str) -> ProviderResult<[u8; 32]> {
	let body = address.strip_prefix("0x").unwrap_or(address);
	let bytes = hex::decode(body).map_err(|e| {
		ProviderError::Swap(SwapError::internal(format!("Invalid EVM address {address}: {e}")))
	})?;
	if bytes.len() != 20 {
		return Err(ProviderError::Swap(SwapError::internal(format!(
			"Invalid EVM address length: {address}"
		))));
	}
	word_from_bytes(&bytes)
}

/// ABI-encoded `approve(spender, amount)` as 0x-prefixed hex
pub fn approve_calldata(spender: &str, amount: &Amount) -> ProviderResult<String> {
	let mut data = Vec::with_capacity(4 + 64);
	data.extend_from_slice(&APPROVE_SELECTOR);
	data.extend_from_slice(&address_word(spender)?);
	data.extend_from_slice(&word_from_bytes(&amount.as_biguint().to_bytes_be())?);
	Ok(format!("0x{}", hex::encode(data)))
}
