//! Caller-facing request and parameter types

use serde::{Deserialize, Serialize};

use super::{SwapPair, SwapProcess, SwapQuote};
use crate::models::{Amount, Slippage};

/// A user's intent to convert one asset into another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
	/// Sender account
	pub address: String,
	pub pair: SwapPair,
	pub from_amount: Amount,
	#[serde(default)]
	pub slippage: Slippage,
	/// Receiver on the destination chain, defaults to `address`
	#[serde(default)]
	pub recipient: Option<String>,
	#[serde(default)]
	pub preferred_provider: Option<String>,
	/// Asset the user wants to pay network fees with
	#[serde(default)]
	pub fee_token: Option<String>,
}

impl SwapRequest {
	pub fn new(address: impl Into<String>, pair: SwapPair, from_amount: Amount) -> Self {
		Self {
			address: address.into(),
			pair,
			from_amount,
			slippage: Slippage::default(),
			recipient: None,
			preferred_provider: None,
			fee_token: None,
		}
	}

	pub fn with_slippage(mut self, slippage: Slippage) -> Self {
		self.slippage = slippage;
		self
	}

	pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
		self.recipient = Some(recipient.into());
		self
	}

	pub fn with_preferred_provider(mut self, provider: impl Into<String>) -> Self {
		self.preferred_provider = Some(provider.into());
		self
	}

	pub fn with_fee_token(mut self, token: impl Into<String>) -> Self {
		self.fee_token = Some(token.into());
		self
	}

	/// Account receiving the final output
	pub fn receiver(&self) -> &str {
		self.recipient.as_deref().unwrap_or(&self.address)
	}
}

/// Inputs of `validate_swap`
#[derive(Debug, Clone)]
pub struct ValidateSwapParams {
	pub request: SwapRequest,
	pub process: SwapProcess,
	pub quote: SwapQuote,
}

/// Inputs of `submit_step`
#[derive(Debug, Clone)]
pub struct SubmitStepParams {
	pub request: SwapRequest,
	pub process: SwapProcess,
	pub quote: SwapQuote,
	pub step_index: usize,
}
