//! Mock-backed chain services for handler tests

use std::collections::HashMap;
use std::sync::Arc;
use xswap_types::{
	AccountBalance, Amount, Asset, ChainInfo, FeeParameters, MockBalanceOracle,
	MockChainRegistry, MockChainRpc, MockFeeOracle, OracleError, ValidationPolicy,
};

use crate::common::ChainServices;

/// In-memory world the mocks answer from
#[derive(Debug, Clone, Default)]
pub struct Fixture {
	assets: HashMap<String, Asset>,
	chains: HashMap<String, ChainInfo>,
	/// (chain, asset) -> balance, shared by every address
	balances: HashMap<(String, String), AccountBalance>,
	fees: HashMap<String, FeeParameters>,
	allowance: Amount,
}

impl Fixture {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn chain(mut self, chain: ChainInfo) -> Self {
		self.chains.insert(chain.slug.clone(), chain);
		self
	}

	pub fn asset(mut self, asset: Asset) -> Self {
		self.assets.insert(asset.slug.clone(), asset);
		self
	}

	pub fn balance(mut self, chain: &str, asset: &str, value: u64, is_alive: bool) -> Self {
		self.balances.insert(
			(chain.to_string(), asset.to_string()),
			AccountBalance::new(Amount::from(value), 0, asset, is_alive),
		);
		self
	}

	/// Flat fee of `base_fee` per step in `fee_token`
	pub fn flat_fee(mut self, chain: &str, fee_token: &str, base_fee: u64) -> Self {
		self.fees.insert(
			chain.to_string(),
			FeeParameters {
				fee_token: fee_token.to_string(),
				base_fee: Amount::from(base_fee),
				unit_price: Amount::zero(),
				delivery_fee: Amount::zero(),
			},
		);
		self
	}

	pub fn allowance(mut self, allowance: u64) -> Self {
		self.allowance = Amount::from(allowance);
		self
	}

	pub fn services(self) -> ChainServices {
		let mut registry = MockChainRegistry::new();
		let assets = self.assets;
		registry.expect_get_asset().returning(move |slug| {
			assets.get(slug).cloned().ok_or(OracleError::AssetNotFound {
				slug: slug.to_string(),
			})
		});
		let chains = self.chains;
		registry.expect_get_chain().returning(move |slug| {
			chains.get(slug).cloned().ok_or(OracleError::ChainNotFound {
				slug: slug.to_string(),
			})
		});

		let mut balances = MockBalanceOracle::new();
		let transferable = self.balances.clone();
		balances
			.expect_get_transferable_balance()
			.returning(move |_, chain, asset| {
				Ok(transferable
					.get(&(chain.to_string(), asset.to_string()))
					.cloned()
					.unwrap_or_else(|| AccountBalance::new(Amount::zero(), 0, asset, false)))
			});
		let total = self.balances;
		balances
			.expect_get_total_balance()
			.returning(move |_, chain, asset| {
				Ok(total
					.get(&(chain.to_string(), asset.to_string()))
					.cloned()
					.unwrap_or_else(|| AccountBalance::new(Amount::zero(), 0, asset, false)))
			});

		let mut fees = MockFeeOracle::new();
		let params = self.fees;
		fees.expect_get_fee_parameters().returning(move |chain, _| {
			params.get(chain).cloned().ok_or(OracleError::FeeUnavailable {
				chain: chain.to_string(),
				reason: "no fixture".to_string(),
			})
		});

		let mut rpc = MockChainRpc::new();
		let allowance = self.allowance;
		rpc.expect_get_allowance()
			.returning(move |_, _, _, _| Ok(allowance.clone()));

		ChainServices {
			registry: Arc::new(registry),
			balances: Arc::new(balances),
			fees: Arc::new(fees),
			rpc: Arc::new(rpc),
			policy: ValidationPolicy::default(),
		}
	}
}
