//! Collaborators a handler needs to generate and validate steps

use std::fmt;
use std::sync::Arc;
use xswap_types::{
	Asset, BalanceOracle, ChainInfo, ChainRegistry, ChainRpc, FeeOracle, FeeParameters,
	ProviderResult, ValidationPolicy,
};

#[derive(Clone)]
pub struct ChainServices {
	pub registry: Arc<dyn ChainRegistry>,
	pub balances: Arc<dyn BalanceOracle>,
	pub fees: Arc<dyn FeeOracle>,
	pub rpc: Arc<dyn ChainRpc>,
	pub policy: ValidationPolicy,
}

impl fmt::Debug for ChainServices {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChainServices")
			.field("policy", &self.policy)
			.finish_non_exhaustive()
	}
}

impl ChainServices {
	/// Asset together with the chain it lives on
	pub fn asset_with_chain(&self, slug: &str) -> ProviderResult<(Asset, ChainInfo)> {
		let asset = self.registry.get_asset(slug)?;
		let chain = self.registry.get_chain(&asset.origin_chain)?;
		Ok((asset, chain))
	}

	pub async fn fee_parameters(&self, chain: &ChainInfo) -> ProviderResult<FeeParameters> {
		Ok(self.fees.get_fee_parameters(&chain.slug, chain.family).await?)
	}
}
