//! RFQ / off-chain order handler
//!
//! Pipeline: optional approval, an off-chain PERMIT signature, then a SWAP
//! step that relays the signed order and polls until it is filled.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use xswap_types::{
	ChainFamily, ExecutionResult, OffChainOrder, OffChainSignRequest, OrderStatus, PermitMetadata,
	ProcessContext, ProcessStep, ProviderApi, ProviderError, ProviderHandler, ProviderInfo,
	ProviderResult, QuoteRequest, StepFeeInfo, StepMetadata, StepType, SwapActionKind, SwapError,
	SwapErrorKind, SwapPath, SwapProcess, SwapQuote, SwapRequest, TransactionPayload,
};

use super::amm::{approval_transaction, unexpected_step};
use crate::common::{generators, validate_process_steps, ChainServices};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RfqQuoteMetadata {
	/// Settlement contract allowed to pull the input token
	spender: String,
	/// Typed data the user signs
	typed_data: serde_json::Value,
	/// Order body relayed together with the signature
	order: serde_json::Value,
}

/// Relay polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfqOptions {
	pub poll_interval: Duration,
	pub fill_timeout: Duration,
}

impl Default for RfqOptions {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_secs(2),
			fill_timeout: Duration::from_secs(120),
		}
	}
}

pub struct RfqHandler {
	info: ProviderInfo,
	api: Arc<dyn ProviderApi>,
	services: ChainServices,
	options: RfqOptions,
}

impl std::fmt::Debug for RfqHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RfqHandler")
			.field("info", &self.info)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

impl RfqHandler {
	pub fn new(
		info: ProviderInfo,
		api: Arc<dyn ProviderApi>,
		services: ChainServices,
		options: RfqOptions,
	) -> Self {
		Self {
			info,
			api,
			services,
			options,
		}
	}

	fn signed_order(
		&self,
		quote: &SwapQuote,
		context: &ProcessContext,
	) -> ProviderResult<OffChainOrder> {
		let meta: RfqQuoteMetadata = quote.metadata_as()?;
		let signature = context
			.signature(StepType::Permit)
			.ok_or(ProviderError::MissingSignature {
				step_type: StepType::Permit,
			})?;
		Ok(OffChainOrder {
			provider: self.id().to_string(),
			quote_id: quote.id.to_string(),
			order: meta.order,
			signature: signature.to_string(),
		})
	}

	async fn poll_until_final(&self, order_id: &str) -> ProviderResult<ExecutionResult> {
		loop {
			match self.api.order_status(order_id).await? {
				OrderStatus::Pending => {
					debug!("Order {} still pending", order_id);
					tokio::time::sleep(self.options.poll_interval).await;
				},
				OrderStatus::Filled { tx_hash } => {
					info!("Order {} filled by {}", order_id, self.id());
					return Ok(ExecutionResult::OrderFilled {
						order_id: order_id.to_string(),
						tx_hash,
					});
				},
				OrderStatus::Failed { reason } => {
					return Err(ProviderError::OrderFailed {
						order_id: order_id.to_string(),
						reason,
					});
				},
				OrderStatus::Expired => {
					return Err(SwapError::new(SwapErrorKind::QuoteTimeout).into());
				},
			}
		}
	}

	/// Poll until the order reaches a final state or the fill timeout passes
	async fn wait_for_fill(&self, order_id: &str) -> ProviderResult<ExecutionResult> {
		match tokio::time::timeout(self.options.fill_timeout, self.poll_until_final(order_id)).await
		{
			Ok(result) => result,
			Err(_) => {
				warn!(
					"Order {} not filled within {:?}",
					order_id, self.options.fill_timeout
				);
				Err(ProviderError::timeout(self.options.fill_timeout))
			},
		}
	}
}

#[async_trait]
impl ProviderHandler for RfqHandler {
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
		let meta: RfqQuoteMetadata = quote.metadata_as()?;

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

		builder.push(
			"Sign order",
			StepMetadata::Permit(PermitMetadata {
				chain: chain.slug.clone(),
				typed_data: meta.typed_data,
			}),
			StepFeeInfo::zero(chain.native_asset.clone()),
		);

		// Fills are gasless for the user; only the maker's protocol fee applies
		let mut fee = StepFeeInfo::zero(chain.native_asset.clone());
		fee.fee_components = generators::protocol_fees(quote);
		let (name, metadata, fee) = generators::swap_step(
			&chain,
			action,
			&quote.from_amount,
			&quote.to_amount,
			&request.slippage,
			fee,
		);
		builder.push(name, metadata, fee);

		Ok(builder.build()?)
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
		context: &ProcessContext,
	) -> ProviderResult<TransactionPayload> {
		match &step.step.metadata {
			StepMetadata::TokenApproval(_) => {
				approval_transaction(&self.services, step, &request.address).await
			},
			StepMetadata::Permit(permit) => {
				Ok(TransactionPayload::OffChainSign(OffChainSignRequest {
					chain: permit.chain.clone(),
					signer: request.address.clone(),
					typed_data: permit.typed_data.clone(),
				}))
			},
			StepMetadata::Swap(_) => Ok(TransactionPayload::OffChainOrder(
				self.signed_order(quote, context)?,
			)),
			_ => Err(unexpected_step(step)),
		}
	}

	async fn submit_step(
		&self,
		step: &ProcessStep,
		request: &SwapRequest,
		quote: &SwapQuote,
		context: &mut ProcessContext,
	) -> ProviderResult<ExecutionResult> {
		match step.step_type() {
			StepType::Default => Ok(ExecutionResult::Noop),
			StepType::Swap => {
				let order = self.signed_order(quote, context)?;
				let order_id = self.api.submit_order(&order).await?;
				// The signature is single use once the order is relayed
				context.take_signature(StepType::Permit);
				info!("Relayed order {} to {}", order_id, self.id());
				self.wait_for_fill(&order_id).await
			},
			StepType::Permit => {
				let payload = self
					.build_step_transaction(step, request, quote, context)
					.await?;
				Ok(ExecutionResult::SignatureRequired { payload })
			},
			_ => {
				let payload = self
					.build_step_transaction(step, request, quote, context)
					.await?;
				Ok(ExecutionResult::ReadyToSign { payload })
			},
		}
	}
}
