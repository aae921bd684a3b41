//! Core provider traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::{OrderStatus, ProviderError, ProviderInfo, ProviderResult, QuoteRequest};
use super::ProviderClass;
use crate::errors::SwapError;
use crate::swap::{
	ExecutionResult, OffChainOrder, ProcessContext, ProcessStep, StepType, SwapPath, SwapProcess,
	SwapQuote, SwapRequest, TransactionPayload,
};

/// Remote quote service of one provider
///
/// Only `quote` is required. Order relaying is optional and returns
/// `UnsupportedOperation` unless overridden.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProviderApi: Send + Sync {
	async fn quote(&self, request: &QuoteRequest) -> ProviderResult<SwapQuote>;

	/// Relay a signed order, returning the provider's order id
	async fn submit_order(&self, _order: &OffChainOrder) -> ProviderResult<String> {
		Err(ProviderError::UnsupportedOperation {
			operation: "submit_order".to_string(),
			provider_id: "unknown".to_string(),
		})
	}

	async fn order_status(&self, _order_id: &str) -> ProviderResult<OrderStatus> {
		Err(ProviderError::UnsupportedOperation {
			operation: "order_status".to_string(),
			provider_id: "unknown".to_string(),
		})
	}
}

/// Shared contract of every provider family
///
/// A handler turns a selected quote into a step pipeline, validates that
/// pipeline against live balances and renders each step into a payload for
/// the signing layer.
#[async_trait]
pub trait ProviderHandler: Send + Sync + Debug {
	/// Get provider information
	/// This is the only required accessor, the others derive from it
	fn provider_info(&self) -> &ProviderInfo;

	fn id(&self) -> &str {
		&self.provider_info().provider_id
	}

	fn class(&self) -> ProviderClass {
		self.provider_info().class
	}

	/// Whether the provider can serve a route between these chains
	fn supports_route(&self, from_chain: &str, to_chain: &str) -> bool {
		let info = self.provider_info();
		let cross_chain = from_chain != to_chain;
		cross_chain == info.class.is_cross_chain()
			&& info.covers_chain(from_chain)
			&& info.covers_chain(to_chain)
	}

	async fn fetch_quote(&self, request: &QuoteRequest) -> ProviderResult<SwapQuote>;

	/// Expand the quote into the ordered step pipeline
	async fn generate_process(
		&self,
		path: &SwapPath,
		request: &SwapRequest,
		quote: &SwapQuote,
	) -> ProviderResult<SwapProcess>;

	/// Validate steps in order, returning at most one error (the first failure)
	async fn validate_process(
		&self,
		process: &SwapProcess,
		request: &SwapRequest,
		quote: &SwapQuote,
	) -> Vec<SwapError>;

	async fn build_step_transaction(
		&self,
		step: &ProcessStep,
		request: &SwapRequest,
		quote: &SwapQuote,
		context: &ProcessContext,
	) -> ProviderResult<TransactionPayload>;

	/// Dispatch one step by type
	///
	/// The default renders the payload and hands it back for signing; PERMIT
	/// steps ask for an off-chain signature instead.
	async fn submit_step(
		&self,
		step: &ProcessStep,
		request: &SwapRequest,
		quote: &SwapQuote,
		context: &mut ProcessContext,
	) -> ProviderResult<ExecutionResult> {
		if step.step_type() == StepType::Default {
			return Ok(ExecutionResult::Noop);
		}
		let payload = self
			.build_step_transaction(step, request, quote, context)
			.await?;
		Ok(match step.step_type() {
			StepType::Permit => ExecutionResult::SignatureRequired { payload },
			_ => ExecutionResult::ReadyToSign { payload },
		})
	}
}
