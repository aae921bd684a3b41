//! Test utilities for creating common test objects
//!
//! Builders with sensible defaults for quotes and requests, plus a few
//! fixture chains and assets shared by the crates' tests.

use chrono::{Duration, Utc};

use crate::models::{Amount, Asset, ChainFamily, ChainInfo};
use crate::swap::{StepFeeInfo, SwapPair, SwapQuote, SwapRequest};

pub const EVM_ADDRESS: &str = "0x742d35Cc6634C0532925a3b8D38BA2297C33A9D7";
pub const SUBSTRATE_ADDRESS: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

pub fn ethereum() -> ChainInfo {
	ChainInfo::new("ethereum", ChainFamily::Evm, "ethereum-NATIVE-ETH")
}

pub fn arbitrum() -> ChainInfo {
	ChainInfo::new("arbitrum_one", ChainFamily::Evm, "arbitrum_one-NATIVE-ETH")
}

pub fn hydradx() -> ChainInfo {
	ChainInfo::new("hydradx_main", ChainFamily::Substrate, "hydradx_main-NATIVE-HDX")
}

pub fn statemint() -> ChainInfo {
	ChainInfo::new("statemint", ChainFamily::Substrate, "statemint-NATIVE-DOT")
}

/// ERC20 asset with a 6 decimal denomination
pub fn erc20(chain: &str, symbol: &str) -> Asset {
	Asset::new(&format!("{chain}-ERC20-{symbol}"), chain, symbol, 6)
}

pub fn native(chain: &ChainInfo, symbol: &str, decimals: u8) -> Asset {
	Asset::native(&chain.native_asset, &chain.slug, symbol, decimals)
}

/// Builder for creating test SwapQuote objects with sensible defaults
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
	provider: String,
	pair: SwapPair,
	from_amount: Amount,
	to_amount: Amount,
	fee_info: StepFeeInfo,
	alive_for_secs: Option<i64>,
	min_swap: Option<Amount>,
	metadata: serde_json::Value,
}

impl QuoteBuilder {
	pub fn new(provider: &str, pair: SwapPair) -> Self {
		Self {
			provider: provider.to_string(),
			pair,
			from_amount: Amount::from(1000u64),
			to_amount: Amount::from(980u64),
			fee_info: StepFeeInfo::zero("ethereum-NATIVE-ETH"),
			alive_for_secs: Some(300),
			min_swap: None,
			metadata: serde_json::Value::Null,
		}
	}

	pub fn amounts(mut self, from: u64, to: u64) -> Self {
		self.from_amount = Amount::from(from);
		self.to_amount = Amount::from(to);
		self
	}

	pub fn fee_info(mut self, fee_info: StepFeeInfo) -> Self {
		self.fee_info = fee_info;
		self
	}

	/// Seconds until expiry; negative values build an already expired quote
	pub fn alive_for(mut self, secs: i64) -> Self {
		self.alive_for_secs = Some(secs);
		self
	}

	/// Leave the expiry empty so the broker applies its default
	pub fn without_expiry(mut self) -> Self {
		self.alive_for_secs = None;
		self
	}

	pub fn min_swap(mut self, min_swap: u64) -> Self {
		self.min_swap = Some(Amount::from(min_swap));
		self
	}

	pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
		self.metadata = metadata;
		self
	}

	pub fn build(self) -> SwapQuote {
		let mut quote = SwapQuote::new(
			self.provider,
			self.pair,
			self.from_amount,
			self.to_amount,
			self.fee_info,
		)
		.with_metadata(self.metadata);
		if let Some(secs) = self.alive_for_secs {
			quote = quote.with_alive_until(Utc::now() + Duration::seconds(secs));
		}
		quote.min_swap = self.min_swap;
		quote
	}
}

/// Request for `amount` of `pair` sent from a fixture address matching the source family
pub fn swap_request(pair: SwapPair, amount: u64, family: ChainFamily) -> SwapRequest {
	let address = match family {
		ChainFamily::Substrate => SUBSTRATE_ADDRESS,
		_ => EVM_ADDRESS,
	};
	SwapRequest::new(address, pair, Amount::from(amount))
}
