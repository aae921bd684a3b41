//! Address format detection per chain family
//!
//! Recipient addresses arrive as free text. Before a swap delivers funds to
//! them, the text must parse as an address of the destination chain's family,
//! otherwise the output would be sent somewhere the user cannot control.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};

use super::ChainFamily;

/// Length of an EVM address in bytes
const EVM_ADDRESS_LEN: usize = 20;

/// SS58 payload: 1-2 byte prefix, 32 byte account id, 2 byte checksum
const SS58_LENGTHS: [usize; 2] = [35, 36];

/// Base58check P2PKH/P2SH payload: 1 byte version, 20 byte hash, 4 byte checksum
const BASE58_BTC_LEN: usize = 25;

/// Friendly TON address: flags, workchain, 32 byte hash, 2 byte crc
const TON_FRIENDLY_LEN: usize = 36;

pub fn is_evm_address(address: &str) -> bool {
	match address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")) {
		Some(body) => {
			body.len() == EVM_ADDRESS_LEN * 2 && hex::decode(body).is_ok()
		},
		None => false,
	}
}

pub fn is_substrate_address(address: &str) -> bool {
	if address.starts_with("0x") {
		// Raw 32 byte public key
		let body = &address[2..];
		return body.len() == 64 && hex::decode(body).is_ok();
	}
	match bs58::decode(address).into_vec() {
		Ok(bytes) => SS58_LENGTHS.contains(&bytes.len()),
		Err(_) => false,
	}
}

pub fn is_bitcoin_address(address: &str) -> bool {
	let lower = address.to_ascii_lowercase();
	if ["bc1", "tb1", "bcrt1"].iter().any(|p| lower.starts_with(p)) {
		return (14..=74).contains(&address.len())
			&& lower.chars().all(|c| c.is_ascii_alphanumeric());
	}
	if address.starts_with('1')
		|| address.starts_with('3')
		|| address.starts_with('m')
		|| address.starts_with('n')
		|| address.starts_with('2')
	{
		return matches!(bs58::decode(address).into_vec(), Ok(bytes) if bytes.len() == BASE58_BTC_LEN);
	}
	false
}

pub fn is_ton_address(address: &str) -> bool {
	if let Some((workchain, hash)) = address.split_once(':') {
		return workchain.parse::<i32>().is_ok() && hash.len() == 64 && hex::decode(hash).is_ok();
	}
	if address.len() != 48 {
		return false;
	}
	let normalized = address.replace('+', "-").replace('/', "_");
	matches!(URL_SAFE.decode(normalized), Ok(bytes) if bytes.len() == TON_FRIENDLY_LEN)
}

pub fn is_cardano_address(address: &str) -> bool {
	(address.starts_with("addr1") || address.starts_with("addr_test1"))
		&& address.len() > 50
		&& address.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `address` is well formed for the given chain family
pub fn is_address_for_family(address: &str, family: ChainFamily) -> bool {
	match family {
		ChainFamily::Evm => is_evm_address(address),
		ChainFamily::Substrate => is_substrate_address(address),
		ChainFamily::Bitcoin => is_bitcoin_address(address),
		ChainFamily::Ton => is_ton_address(address),
		ChainFamily::Cardano => is_cardano_address(address),
	}
}

/// Detect the family of an address, if any matches
pub fn detect_family(address: &str) -> Option<ChainFamily> {
	[
		ChainFamily::Evm,
		ChainFamily::Substrate,
		ChainFamily::Bitcoin,
		ChainFamily::Ton,
		ChainFamily::Cardano,
	]
	.into_iter()
	.find(|family| is_address_for_family(address, *family))
}
