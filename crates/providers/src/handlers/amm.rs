//! Same-chain EVM AMM handler: optional approval, then swap

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use xswap_types::{
	Amount, ChainFamily, EvmTransaction, ProcessContext, ProcessStep, ProviderApi,
	ProviderError, ProviderHandler, ProviderInfo, ProviderResult, QuoteRequest, StepMetadata,
	SwapActionKind, SwapError, SwapErrorKind, SwapPath, SwapProcess, SwapQuote, SwapRequest,
	TransactionPayload,
};

use crate::common::evm::{approve_calldata, APPROVAL_GAS, DEFAULT_SWAP_GAS};
use crate::common::{generators, validate_process_steps, ChainServices};

/// Router call prepared by the provider
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmCall {
	pub to: String,
	pub data: String,
	#[serde(default)]
	pub value: Amount,
	#[serde(default)]
	pub gas_limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmmQuoteMetadata {
	/// Router that pulls the input token
	spender: String,
	tx: EvmCall,
}

pub struct AmmHandler {
	info: ProviderInfo,
	api: Arc<dyn ProviderApi>,
	services: ChainServices,
}

impl std::fmt::Debug for AmmHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AmmHandler")
			.field("info", &self.info)
			.finish_non_exhaustive()
	}
}

impl AmmHandler {
	pub fn new(info: ProviderInfo, api: Arc<dyn ProviderApi>, services: ChainServices) -> Self {
		Self {
			info,
			api,
			services,
		}
	}
}

/// EVM transaction for a TOKEN_APPROVAL step
pub(crate) async fn approval_transaction(
	services: &ChainServices,
	step: &ProcessStep,
	owner: &str,
) -> ProviderResult<TransactionPayload> {
	let StepMetadata::TokenApproval(approval) = &step.step.metadata else {
		return Err(unexpected_step(step));
	};
	let chain = services.registry.get_chain(&approval.chain)?;
	let params = services.fee_parameters(&chain).await?;
	Ok(TransactionPayload::Evm(EvmTransaction {
		chain: approval.chain.clone(),
		from: owner.to_string(),
		to: approval.token_address.clone(),
		value: Amount::zero(),
		data: approve_calldata(&approval.spender, &approval.amount)?,
		gas_limit: APPROVAL_GAS,
		max_fee_per_gas: params.unit_price,
	}))
}

pub(crate) fn unexpected_step(step: &ProcessStep) -> ProviderError {
	ProviderError::Swap(SwapError::with_message(
		SwapErrorKind::Unsupported,
		format!("{} steps cannot be built by this provider", step.step_type()),
	))
}

#[async_trait]
impl ProviderHandler for AmmHandler {
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
		let action = path.first();
		if path.len() != 1 || action.kind != SwapActionKind::Swap {
			return Err(SwapError::new(SwapErrorKind::Unsupported).into());
		}
		let (from_asset, chain) = self.services.asset_with_chain(&action.pair.from)?;
		if chain.family != ChainFamily::Evm {
			return Err(SwapError::new(SwapErrorKind::Unsupported).into());
		}
		let meta: AmmQuoteMetadata = quote.metadata_as()?;

		let mut builder = SwapProcess::builder(path.clone(), chain.native_asset.clone());
		builder.push_generated(
			generators::approval_step(
				&self.services,
				&chain,
				&from_asset,
				&request.address,
				&meta.spender,
				&quote.from_amount,
			)
			.await?,
		);

		let gas = meta.tx.gas_limit.unwrap_or(DEFAULT_SWAP_GAS);
		let fee = generators::network_fee(
			&self.services,
			&chain,
			gas,
			generators::protocol_fees(quote),
		)
		.await?;
		let (name, metadata, fee) = generators::swap_step(
			&chain,
			action,
			&quote.from_amount,
			&quote.to_amount,
			&request.slippage,
			fee,
		);
		builder.push(name, metadata, fee);

		let process = builder.build()?;
		debug!(
			"Generated {} step process for {} via {}",
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
			StepMetadata::Swap(leg) => {
				let meta: AmmQuoteMetadata = quote.metadata_as()?;
				let chain = self.services.registry.get_chain(&leg.chain)?;
				let params = self.services.fee_parameters(&chain).await?;
				Ok(TransactionPayload::Evm(EvmTransaction {
					chain: leg.chain.clone(),
					from: request.address.clone(),
					to: meta.tx.to,
					value: meta.tx.value,
					data: meta.tx.data,
					gas_limit: meta.tx.gas_limit.unwrap_or(DEFAULT_SWAP_GAS),
					max_fee_per_gas: params.unit_price,
				}))
			},
			_ => Err(unexpected_step(step)),
		}
	}
}
