//! Asset and chain metadata owned by the external registry

use serde::{Deserialize, Serialize};

use super::Amount;

/// Chain family, which determines the transaction model and address format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
	Evm,
	Substrate,
	Bitcoin,
	Ton,
	Cardano,
}

impl ChainFamily {
	pub fn as_str(&self) -> &'static str {
		match self {
			ChainFamily::Evm => "evm",
			ChainFamily::Substrate => "substrate",
			ChainFamily::Bitcoin => "bitcoin",
			ChainFamily::Ton => "ton",
			ChainFamily::Cardano => "cardano",
		}
	}
}

impl std::fmt::Display for ChainFamily {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Chain metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
	/// Chain slug (e.g. "ethereum", "hydradx_main")
	pub slug: String,
	pub family: ChainFamily,
	pub is_testnet: bool,
	/// Slug of the asset paying network fees by default
	pub native_asset: String,
}

impl ChainInfo {
	pub fn new(slug: &str, family: ChainFamily, native_asset: &str) -> Self {
		Self {
			slug: slug.to_string(),
			family,
			is_testnet: false,
			native_asset: native_asset.to_string(),
		}
	}
}

/// Registry asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
	/// Unique asset slug (e.g. "ethereum-ERC20-USDC-0xA0b8...")
	pub slug: String,
	/// Chain slug the asset lives on
	pub origin_chain: String,
	pub decimals: u8,
	pub symbol: String,
	pub is_native: bool,
	/// Token contract on EVM chains
	#[serde(default)]
	pub contract_address: Option<String>,
	/// Existential deposit of this asset on its chain (zero when the chain has none)
	#[serde(default)]
	pub min_amount: Amount,
	/// Whether holding only this asset keeps an account alive
	#[serde(default)]
	pub is_sufficient: bool,
}

impl Asset {
	pub fn new(slug: &str, origin_chain: &str, symbol: &str, decimals: u8) -> Self {
		Self {
			slug: slug.to_string(),
			origin_chain: origin_chain.to_string(),
			decimals,
			symbol: symbol.to_string(),
			is_native: false,
			contract_address: None,
			min_amount: Amount::zero(),
			is_sufficient: false,
		}
	}

	/// Native chain asset; always sufficient
	pub fn native(slug: &str, origin_chain: &str, symbol: &str, decimals: u8) -> Self {
		Self {
			is_native: true,
			is_sufficient: true,
			..Self::new(slug, origin_chain, symbol, decimals)
		}
	}

	pub fn with_contract(mut self, address: &str) -> Self {
		self.contract_address = Some(address.to_string());
		self
	}

	pub fn with_min_amount(mut self, min_amount: Amount) -> Self {
		self.min_amount = min_amount;
		self
	}

	pub fn sufficient(mut self, is_sufficient: bool) -> Self {
		self.is_sufficient = is_sufficient || self.is_native;
		self
	}

	/// Whether the account can be kept alive by this asset alone
	pub fn keeps_account_alive(&self) -> bool {
		self.is_native || self.is_sufficient
	}
}
