//! Provider descriptors and wire-level request models

use serde::{Deserialize, Serialize};

use crate::models::{Amount, Slippage};
use crate::swap::{SwapPair, SwapRequest};

/// Family of provider, which decides the step pipeline and default quote TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderClass {
	/// On-chain AMM on a single EVM chain
	Amm,
	/// Off-chain signed orders filled by a market maker
	Rfq,
	/// AMM routes spanning a bridge leg
	CrossChainAmm,
	/// Substrate hub with an on-chain router
	Hub,
}

impl ProviderClass {
	pub fn as_str(&self) -> &'static str {
		match self {
			ProviderClass::Amm => "amm",
			ProviderClass::Rfq => "rfq",
			ProviderClass::CrossChainAmm => "cross_chain_amm",
			ProviderClass::Hub => "hub",
		}
	}

	/// Order-book style quotes go stale quickly
	pub fn is_order_book(&self) -> bool {
		matches!(self, ProviderClass::Rfq)
	}

	pub fn is_cross_chain(&self) -> bool {
		matches!(self, ProviderClass::CrossChainAmm)
	}
}

impl std::fmt::Display for ProviderClass {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Static description of a registered provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
	pub provider_id: String,
	pub name: String,
	pub class: ProviderClass,
	/// Chains the provider operates on; empty means no restriction
	#[serde(default)]
	pub chains: Vec<String>,
}

impl ProviderInfo {
	pub fn new(provider_id: impl Into<String>, class: ProviderClass) -> Self {
		let provider_id = provider_id.into();
		Self {
			name: provider_id.clone(),
			provider_id,
			class,
			chains: Vec::new(),
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_chains(mut self, chains: Vec<String>) -> Self {
		self.chains = chains;
		self
	}

	pub fn covers_chain(&self, chain: &str) -> bool {
		self.chains.is_empty() || self.chains.iter().any(|c| c == chain)
	}
}

/// Quote request sent to one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	pub pair: SwapPair,
	pub from_amount: Amount,
	pub address: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recipient: Option<String>,
	pub slippage: Slippage,
	pub is_cross_chain: bool,
}

impl QuoteRequest {
	pub fn from_swap_request(request: &SwapRequest, pair: SwapPair, is_cross_chain: bool) -> Self {
		Self {
			pair,
			from_amount: request.from_amount.clone(),
			address: request.address.clone(),
			recipient: request.recipient.clone(),
			slippage: request.slippage,
			is_cross_chain,
		}
	}
}

/// Fill state of a relayed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderStatus {
	Pending,
	Filled {
		#[serde(default)]
		tx_hash: Option<String>,
	},
	Failed { reason: String },
	Expired,
}

impl OrderStatus {
	pub fn is_final(&self) -> bool {
		!matches!(self, OrderStatus::Pending)
	}
}
