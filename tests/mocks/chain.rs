//! In-memory chain: registry, balances, fees, allowances and paths

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use xswap::{
	AccountBalance, Amount, Asset, BalanceOracle, ChainFamily, ChainInfo, ChainRegistry, ChainRpc,
	Collaborators, DynamicSwapAction, FeeOracle, FeeParameters, LiquidityGraph, OracleError,
	SwapPair,
};

pub const EVM_USER: &str = "0x742d35Cc6634C0532925a3b8D38BA2297C33A9D7";
pub const SUBSTRATE_USER: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

pub const USDC: &str = "ethereum-ERC20-USDC";
pub const WETH: &str = "ethereum-ERC20-WETH";
pub const ETH: &str = "ethereum-NATIVE-ETH";
pub const HDX: &str = "hydradx_main-NATIVE-HDX";
pub const USDT: &str = "hydradx_main-LOCAL-USDT";
pub const DOT: &str = "hydradx_main-LOCAL-DOT";
pub const USDT_AH: &str = "statemint-LOCAL-USDt";
pub const DOT_AH: &str = "statemint-NATIVE-DOT";

/// Mock chain world shared by every collaborator trait
///
/// Balances are keyed by (chain, asset) and shared by all addresses.
/// Paths are keyed by the pair, alternative included.
#[derive(Debug, Default)]
pub struct InMemoryChain {
	assets: HashMap<String, Asset>,
	chains: HashMap<String, ChainInfo>,
	balances: RwLock<HashMap<(String, String), AccountBalance>>,
	fees: HashMap<String, FeeParameters>,
	allowance: Amount,
	paths: HashMap<String, Vec<DynamicSwapAction>>,
	balance_calls: AtomicUsize,
	path_calls: AtomicUsize,
}

fn path_key(pair: &SwapPair) -> String {
	format!(
		"{}|{}",
		pair.slug(),
		pair.alternative_asset.as_deref().unwrap_or_default()
	)
}

impl InMemoryChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Ethereum, HydraDX and Asset Hub with their common assets
	pub fn standard() -> Self {
		Self::new()
			.chain(ChainInfo::new("ethereum", ChainFamily::Evm, ETH))
			.chain(ChainInfo::new("hydradx_main", ChainFamily::Substrate, HDX))
			.chain(ChainInfo::new("statemint", ChainFamily::Substrate, DOT_AH))
			.asset(Asset::native(ETH, "ethereum", "ETH", 18))
			.asset(
				Asset::new(USDC, "ethereum", "USDC", 6)
					.with_contract("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
			)
			.asset(
				Asset::new(WETH, "ethereum", "WETH", 18)
					.with_contract("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
			)
			.asset(Asset::native(HDX, "hydradx_main", "HDX", 12))
			.asset(Asset::new(USDT, "hydradx_main", "USDT", 6).sufficient(true))
			.asset(Asset::new(DOT, "hydradx_main", "DOT", 10).sufficient(true))
			.asset(Asset::native(DOT_AH, "statemint", "DOT", 10))
			.asset(Asset::new(USDT_AH, "statemint", "USDt", 6).sufficient(true))
			.flat_fee("ethereum", ETH, 100)
			.flat_fee("hydradx_main", HDX, 5)
			.flat_fee("statemint", USDT_AH, 60)
			.allowance(u64::MAX)
	}

	pub fn chain(mut self, chain: ChainInfo) -> Self {
		self.chains.insert(chain.slug.clone(), chain);
		self
	}

	pub fn asset(mut self, asset: Asset) -> Self {
		self.assets.insert(asset.slug.clone(), asset);
		self
	}

	pub fn balance(self, chain: &str, asset: &str, value: u64, is_alive: bool) -> Self {
		self.set_balance(chain, asset, value, is_alive);
		self
	}

	pub fn set_balance(&self, chain: &str, asset: &str, value: u64, is_alive: bool) {
		if let Ok(mut balances) = self.balances.write() {
			balances.insert(
				(chain.to_string(), asset.to_string()),
				AccountBalance::new(Amount::from(value), 0, asset, is_alive),
			);
		}
	}

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

	pub fn path(mut self, pair: &SwapPair, actions: Vec<DynamicSwapAction>) -> Self {
		self.paths.insert(path_key(pair), actions);
		self
	}

	pub fn balance_calls(&self) -> usize {
		self.balance_calls.load(Ordering::Relaxed)
	}

	pub fn path_calls(&self) -> usize {
		self.path_calls.load(Ordering::Relaxed)
	}

	/// Every collaborator trait served by this one world
	pub fn collaborators(self: &Arc<Self>) -> Collaborators {
		Collaborators {
			registry: self.clone(),
			balances: self.clone(),
			fees: self.clone(),
			rpc: self.clone(),
			graph: self.clone(),
		}
	}

	fn lookup_balance(&self, chain: &str, asset: &str) -> AccountBalance {
		self.balance_calls.fetch_add(1, Ordering::Relaxed);
		self.balances
			.read()
			.ok()
			.and_then(|balances| {
				balances
					.get(&(chain.to_string(), asset.to_string()))
					.cloned()
			})
			.unwrap_or_else(|| AccountBalance::new(Amount::zero(), 0, asset, false))
	}
}

impl ChainRegistry for InMemoryChain {
	fn get_asset(&self, slug: &str) -> Result<Asset, OracleError> {
		self.assets
			.get(slug)
			.cloned()
			.ok_or_else(|| OracleError::AssetNotFound {
				slug: slug.to_string(),
			})
	}

	fn get_chain(&self, slug: &str) -> Result<ChainInfo, OracleError> {
		self.chains
			.get(slug)
			.cloned()
			.ok_or_else(|| OracleError::ChainNotFound {
				slug: slug.to_string(),
			})
	}
}

#[async_trait]
impl BalanceOracle for InMemoryChain {
	async fn get_transferable_balance(
		&self,
		_address: &str,
		chain: &str,
		asset_slug: &str,
	) -> Result<AccountBalance, OracleError> {
		Ok(self.lookup_balance(chain, asset_slug))
	}

	async fn get_total_balance(
		&self,
		_address: &str,
		chain: &str,
		asset_slug: &str,
	) -> Result<AccountBalance, OracleError> {
		Ok(self.lookup_balance(chain, asset_slug))
	}
}

#[async_trait]
impl FeeOracle for InMemoryChain {
	async fn get_fee_parameters(
		&self,
		chain: &str,
		_family: ChainFamily,
	) -> Result<FeeParameters, OracleError> {
		self.fees
			.get(chain)
			.cloned()
			.ok_or_else(|| OracleError::FeeUnavailable {
				chain: chain.to_string(),
				reason: "no fee parameters configured".to_string(),
			})
	}
}

#[async_trait]
impl ChainRpc for InMemoryChain {
	async fn get_allowance(
		&self,
		_chain: &str,
		_token_address: &str,
		_owner: &str,
		_spender: &str,
	) -> Result<Amount, OracleError> {
		Ok(self.allowance.clone())
	}
}

#[async_trait]
impl LiquidityGraph for InMemoryChain {
	async fn find_path(
		&self,
		pair: &SwapPair,
	) -> Result<Option<Vec<DynamicSwapAction>>, OracleError> {
		self.path_calls.fetch_add(1, Ordering::Relaxed);
		Ok(self.paths.get(&path_key(pair)).cloned())
	}
}
