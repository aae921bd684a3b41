//! Chain-family specific payloads handed to the signing layer

use serde::{Deserialize, Serialize};

use crate::models::Amount;

/// EVM call with gas parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransaction {
	pub chain: String,
	pub from: String,
	pub to: String,
	pub value: Amount,
	/// 0x-prefixed calldata
	pub data: String,
	pub gas_limit: u64,
	pub max_fee_per_gas: Amount,
}

/// Substrate extrinsic call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstrateCall {
	pub chain: String,
	pub signer: String,
	pub pallet: String,
	pub call: String,
	pub args: serde_json::Value,
	/// Asset paying the transaction fee when it is not the native one
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_asset: Option<String>,
}

/// Typed data the user signs off-chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffChainSignRequest {
	pub chain: String,
	pub signer: String,
	pub typed_data: serde_json::Value,
}

/// Signed order relayed to a provider for filling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffChainOrder {
	pub provider: String,
	pub quote_id: String,
	pub order: serde_json::Value,
	pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionPayload {
	Evm(EvmTransaction),
	Substrate(SubstrateCall),
	OffChainSign(OffChainSignRequest),
	OffChainOrder(OffChainOrder),
}

/// Outcome of submitting one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
	/// Transaction built, waiting for the user to sign and broadcast it
	ReadyToSign { payload: TransactionPayload },
	/// Off-chain signature needed; record it in the process context
	SignatureRequired { payload: TransactionPayload },
	/// Relayed order was filled by the provider
	OrderFilled {
		order_id: String,
		tx_hash: Option<String>,
	},
	/// Nothing to execute (DEFAULT anchor)
	Noop,
}
