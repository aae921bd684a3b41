//! Traits for the external collaborators the swap core consumes
//!
//! Balances, chain metadata, fee parameters, allowances and path finding are
//! owned by other parts of the wallet. The core only sees them through these
//! traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::OracleResult;
use crate::models::{Amount, Asset, ChainFamily, ChainInfo};
use crate::swap::{DynamicSwapAction, SwapPair};

/// Chain liveness signals attached to a balance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceMetadata {
	/// Account is registered on the chain (above its keep-alive minimum)
	pub is_alive: bool,
	#[serde(default)]
	pub locked: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
	pub value: Amount,
	pub decimals: u8,
	pub symbol: String,
	#[serde(default)]
	pub metadata: BalanceMetadata,
}

impl AccountBalance {
	pub fn new(value: Amount, decimals: u8, symbol: impl Into<String>, is_alive: bool) -> Self {
		Self {
			value,
			decimals,
			symbol: symbol.into(),
			metadata: BalanceMetadata {
				is_alive,
				locked: Amount::zero(),
			},
		}
	}

	pub fn is_alive(&self) -> bool {
		self.metadata.is_alive
	}
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait BalanceOracle: Send + Sync {
	async fn get_transferable_balance(
		&self,
		address: &str,
		chain: &str,
		asset_slug: &str,
	) -> OracleResult<AccountBalance>;

	/// Transferable plus locked balance
	async fn get_total_balance(
		&self,
		address: &str,
		chain: &str,
		asset_slug: &str,
	) -> OracleResult<AccountBalance>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait ChainRegistry: Send + Sync {
	fn get_asset(&self, slug: &str) -> OracleResult<Asset>;

	fn get_chain(&self, slug: &str) -> OracleResult<ChainInfo>;
}

/// Native fee parameters of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeParameters {
	/// Asset the fee is paid in
	pub fee_token: String,
	pub base_fee: Amount,
	/// Price per execution unit (gas, weight)
	pub unit_price: Amount,
	/// Fee charged on the receiving side of a cross-chain transfer
	#[serde(default)]
	pub delivery_fee: Amount,
}

impl FeeParameters {
	/// `base_fee + unit_price * units`
	pub fn estimate(&self, units: u64) -> Amount {
		&self.base_fee + &(&self.unit_price * units)
	}
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait FeeOracle: Send + Sync {
	async fn get_fee_parameters(
		&self,
		chain: &str,
		family: ChainFamily,
	) -> OracleResult<FeeParameters>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ChainRpc: Send + Sync {
	/// Allowance granted by `owner` to `spender` on a token contract
	async fn get_allowance(
		&self,
		chain: &str,
		token_address: &str,
		owner: &str,
		spender: &str,
	) -> OracleResult<Amount>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LiquidityGraph: Send + Sync {
	/// Cheapest action sequence for the pair, `None` when unreachable
	async fn find_path(&self, pair: &SwapPair) -> OracleResult<Option<Vec<DynamicSwapAction>>>;
}
