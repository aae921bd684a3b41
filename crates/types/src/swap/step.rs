//! Process steps and their typed metadata

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DynamicSwapAction, StepFeeInfo};
use crate::models::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
	Default,
	TokenApproval,
	Permit,
	Bridge,
	Swap,
	SetFeeToken,
}

impl fmt::Display for StepType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			StepType::Default => "DEFAULT",
			StepType::TokenApproval => "TOKEN_APPROVAL",
			StepType::Permit => "PERMIT",
			StepType::Bridge => "BRIDGE",
			StepType::Swap => "SWAP",
			StepType::SetFeeToken => "SET_FEE_TOKEN",
		};
		f.write_str(name)
	}
}

/// ERC20-style allowance grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalMetadata {
	pub chain: String,
	pub token_slug: String,
	/// Contract address of the token on `chain`
	pub token_address: String,
	pub spender: String,
	pub amount: Amount,
}

/// Off-chain typed data the user signs before an order is relayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitMetadata {
	pub chain: String,
	pub typed_data: serde_json::Value,
}

/// Cross-chain transfer of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeLeg {
	pub from_asset: String,
	pub to_asset: String,
	pub from_chain: String,
	pub to_chain: String,
	/// Amount debited from the sender, including the fee when `fee_included`
	pub amount: Amount,
	/// Whether the self-paid fee was already added on top of the nominal amount
	pub fee_included: bool,
	/// Fee charged on the destination side before crediting the receiver
	#[serde(default)]
	pub delivery_fee: Amount,
	pub sender: String,
	pub receiver: String,
}

/// Provider-executed conversion on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapLeg {
	pub from_asset: String,
	pub to_asset: String,
	pub chain: String,
	pub from_amount: Amount,
	pub to_amount: Amount,
	/// `to_amount` after slippage, rounded down
	pub min_received: Amount,
}

/// Choice of the asset paying network fees on a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFeeTokenMetadata {
	pub chain: String,
	pub fee_token: String,
	/// Amount of `fee_token` the remaining steps need for fees
	pub fee_amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepMetadata {
	Default,
	TokenApproval(ApprovalMetadata),
	Permit(PermitMetadata),
	Bridge(BridgeLeg),
	Swap(SwapLeg),
	SetFeeToken(SetFeeTokenMetadata),
}

impl StepMetadata {
	pub fn step_type(&self) -> StepType {
		match self {
			StepMetadata::Default => StepType::Default,
			StepMetadata::TokenApproval(_) => StepType::TokenApproval,
			StepMetadata::Permit(_) => StepType::Permit,
			StepMetadata::Bridge(_) => StepType::Bridge,
			StepMetadata::Swap(_) => StepType::Swap,
			StepMetadata::SetFeeToken(_) => StepType::SetFeeToken,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
	/// Position in the process, the DEFAULT anchor is 0
	pub id: usize,
	pub name: String,
	pub metadata: StepMetadata,
}

impl Step {
	pub fn step_type(&self) -> StepType {
		self.metadata.step_type()
	}

	/// Path action this step executes, if it is a bridge or swap
	pub fn action(&self) -> Option<DynamicSwapAction> {
		match &self.metadata {
			StepMetadata::Bridge(leg) => Some(DynamicSwapAction::bridge(
				leg.from_asset.clone(),
				leg.to_asset.clone(),
			)),
			StepMetadata::Swap(leg) => Some(DynamicSwapAction::swap(
				leg.from_asset.clone(),
				leg.to_asset.clone(),
			)),
			_ => None,
		}
	}
}

/// One entry of a process: the step and what it costs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStep {
	pub step: Step,
	pub fee: StepFeeInfo,
}

impl ProcessStep {
	pub fn step_type(&self) -> StepType {
		self.step.step_type()
	}
}
