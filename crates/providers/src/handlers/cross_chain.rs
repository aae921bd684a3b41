//! Cross-chain AMM handler
//!
//! Routes mix one swap with bridge legs, in either order
//! (approval, bridge, approval, swap or swap then bridge). The quote carries
//! one leg entry per path action with the amounts and prepared calls.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use xswap_types::{
	Amount, ChainFamily, EvmTransaction, ProcessContext, ProcessStep, ProviderApi,
	ProviderHandler, ProviderInfo, ProviderResult, QuoteRequest, StepMetadata, SwapActionKind,
	SwapError, SwapPath, SwapProcess, SwapQuote, SwapRequest, TransactionPayload,
};

use super::amm::{approval_transaction, unexpected_step, EvmCall};
use super::hub::xcm_transfer_call;
use crate::common::evm::{DEFAULT_BRIDGE_GAS, DEFAULT_SWAP_GAS};
use crate::common::{generators, validate_process_steps, ChainServices};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegQuote {
	from_asset: String,
	to_asset: String,
	from_amount: Amount,
	to_amount: Amount,
	/// Contract pulling `from_asset`, when an approval is needed
	#[serde(default)]
	spender: Option<String>,
	#[serde(default)]
	tx: Option<EvmCall>,
}

#[derive(Debug, Clone, Deserialize)]
struct CrossChainQuoteMetadata {
	legs: Vec<LegQuote>,
}

impl CrossChainQuoteMetadata {
	fn leg_for(&self, from_asset: &str, to_asset: &str) -> ProviderResult<&LegQuote> {
		self.legs
			.iter()
			.find(|leg| leg.from_asset == from_asset && leg.to_asset == to_asset)
			.ok_or_else(|| {
				SwapError::internal(format!("Quote has no leg for {from_asset} -> {to_asset}"))
					.into()
			})
	}
}

pub struct CrossChainAmmHandler {
	info: ProviderInfo,
	api: Arc<dyn ProviderApi>,
	services: ChainServices,
}

impl std::fmt::Debug for CrossChainAmmHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CrossChainAmmHandler")
			.field("info", &self.info)
			.finish_non_exhaustive()
	}
}

impl CrossChainAmmHandler {
	pub fn new(info: ProviderInfo, api: Arc<dyn ProviderApi>, services: ChainServices) -> Self {
		Self {
			info,
			api,
			services,
		}
	}

	async fn leg_transaction(
		&self,
		chain_slug: &str,
		leg: &LegQuote,
		request: &SwapRequest,
		default_gas: u64,
	) -> ProviderResult<Option<TransactionPayload>> {
		let Some(tx) = &leg.tx else {
			return Ok(None);
		};
		let chain = self.services.registry.get_chain(chain_slug)?;
		let params = self.services.fee_parameters(&chain).await?;
		Ok(Some(TransactionPayload::Evm(EvmTransaction {
			chain: chain_slug.to_string(),
			from: request.address.clone(),
			to: tx.to.clone(),
			value: tx.value.clone(),
			data: tx.data.clone(),
			gas_limit: tx.gas_limit.unwrap_or(default_gas),
			max_fee_per_gas: params.unit_price,
		})))
	}
}

#[async_trait]
impl ProviderHandler for CrossChainAmmHandler {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn fetch_quote(&self, request: &QuoteRequest) -> ProviderResult<SwapQuote> {
		self.api.quote(request).await
	}

	async fn generate_process(
		&self,
		path: &SwapPath,
		request: &SwapRequest,
		quote: &SwapQuote,
	) -> ProviderResult<SwapProcess> {
		let meta: CrossChainQuoteMetadata = quote.metadata_as()?;
		if meta.legs.len() != path.len() {
			return Err(SwapError::internal(format!(
				"Quote describes {} legs for a {} action path",
				meta.legs.len(),
				path.len()
			))
			.into());
		}

		let (_, first_chain) = self.services.asset_with_chain(&path.first().pair.from)?;
		let mut builder = SwapProcess::builder(path.clone(), first_chain.native_asset.clone());
		let last = path.len() - 1;

		for (index, action) in path.actions().iter().enumerate() {
			let leg = meta.leg_for(&action.pair.from, &action.pair.to)?;
			let (from_asset, from_chain) = self.services.asset_with_chain(&action.pair.from)?;

			if let Some(spender) = &leg.spender {
				builder.push_generated(
					generators::approval_step(
						&self.services,
						&from_chain,
						&from_asset,
						&request.address,
						spender,
						&leg.from_amount,
					)
					.await?,
				);
			}

			let protocol = if index == last {
				generators::protocol_fees(quote)
			} else {
				Vec::new()
			};
			let gas_of = |default: u64| {
				leg.tx
					.as_ref()
					.and_then(|tx| tx.gas_limit)
					.unwrap_or(default)
			};

			match action.kind {
				SwapActionKind::Swap => {
					let fee = generators::network_fee(
						&self.services,
						&from_chain,
						gas_of(DEFAULT_SWAP_GAS),
						protocol,
					)
					.await?;
					let (name, metadata, fee) = generators::swap_step(
						&from_chain,
						action,
						&leg.from_amount,
						&leg.to_amount,
						&request.slippage,
						fee,
					);
					builder.push(name, metadata, fee);
				},
				SwapActionKind::Bridge => {
					let (_, to_chain) = self.services.asset_with_chain(&action.pair.to)?;
					let receiver = if index == last {
						request.receiver()
					} else {
						&request.address
					};
					let (name, metadata, mut fee) = generators::bridge_step(
						&self.services,
						&from_chain,
						&to_chain,
						action,
						&leg.from_amount,
						gas_of(DEFAULT_BRIDGE_GAS),
						&request.address,
						receiver,
					)
					.await?;
					fee.fee_components.extend(protocol);
					builder.push(name, metadata, fee);
				},
			}
		}

		let process = builder.build()?;
		debug!(
			"Generated {} step cross-chain process for {} via {}",
			process.steps.len(),
			request.pair,
			self.id()
		);
		Ok(process)
	}

	async fn validate_process(
		&self,
		process: &SwapProcess,
		request: &SwapRequest,
		quote: &SwapQuote,
	) -> Vec<SwapError> {
		validate_process_steps(&self.services, process, request, quote).await
	}

	async fn build_step_transaction(
		&self,
		step: &ProcessStep,
		request: &SwapRequest,
		quote: &SwapQuote,
		_context: &ProcessContext,
	) -> ProviderResult<TransactionPayload> {
		match &step.step.metadata {
			StepMetadata::TokenApproval(_) => {
				approval_transaction(&self.services, step, &request.address).await
			},
			StepMetadata::Swap(swap) => {
				let meta: CrossChainQuoteMetadata = quote.metadata_as()?;
				let leg = meta.leg_for(&swap.from_asset, &swap.to_asset)?;
				self.leg_transaction(&swap.chain, leg, request, DEFAULT_SWAP_GAS)
					.await?
					.ok_or_else(|| SwapError::internal("Swap leg has no prepared call").into())
			},
			StepMetadata::Bridge(bridge) => {
				let meta: CrossChainQuoteMetadata = quote.metadata_as()?;
				let leg = meta.leg_for(&bridge.from_asset, &bridge.to_asset)?;
				if let Some(payload) = self
					.leg_transaction(&bridge.from_chain, leg, request, DEFAULT_BRIDGE_GAS)
					.await?
				{
					return Ok(payload);
				}
				let chain = self.services.registry.get_chain(&bridge.from_chain)?;
				if chain.family != ChainFamily::Substrate {
					return Err(SwapError::internal("Bridge leg has no prepared call").into());
				}
				Ok(xcm_transfer_call(bridge, &step.fee, &chain))
			},
			_ => Err(unexpected_step(step)),
		}
	}
}
