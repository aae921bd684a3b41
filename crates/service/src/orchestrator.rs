//! Swap orchestration
//!
//! Entry point of the core: plan a swap (path, quotes, step pipeline),
//! validate it against live balances, then execute it one step at a time.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use xswap_providers::ProviderRegistry;
use xswap_types::{
	Amount, BalanceOracle, BridgeLeg, ChainRegistry, ExecutionResult, ProcessContext,
	ProviderHandler, QuoteRequest, StepFeeInfo, StepMetadata, SubmitStepParams, SwapActionKind,
	SwapError, SwapErrorKind, SwapLeg, SwapPair, SwapPath, SwapProcess, SwapQuote, SwapRequest,
	SwapResult, ValidateSwapParams,
};

use crate::pairs::PairCatalog;
use crate::path_resolver::PathResolverTrait;
use crate::quote_broker::QuoteBrokerTrait;

/// Maintenance switches checked before validation and execution
#[derive(Debug, Clone, Default)]
pub struct FeatureFlags {
	pub maintenance: bool,
	pub blocked_providers: HashSet<String>,
}

impl FeatureFlags {
	pub fn blocks(&self, provider_id: &str) -> bool {
		self.maintenance || self.blocked_providers.contains(provider_id)
	}
}

/// Outcome of planning a swap
#[derive(Debug, Clone)]
pub struct SwapPlan {
	pub process: SwapProcess,
	/// Selected quote, absent when no provider could quote the swap
	pub quote: Option<SwapQuote>,
	/// Every quote received, best first
	pub quotes: Vec<SwapQuote>,
	/// Why no quote was selected
	pub error: Option<SwapError>,
}

pub struct SwapOrchestrator {
	resolver: Arc<dyn PathResolverTrait>,
	broker: Arc<dyn QuoteBrokerTrait>,
	providers: Arc<ProviderRegistry>,
	registry: Arc<dyn ChainRegistry>,
	balances: Arc<dyn BalanceOracle>,
	pairs: PairCatalog,
	features: FeatureFlags,
}

impl std::fmt::Debug for SwapOrchestrator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SwapOrchestrator")
			.field("providers", &self.providers.ids())
			.field("pairs", &self.pairs.len())
			.field("features", &self.features)
			.finish_non_exhaustive()
	}
}

impl SwapOrchestrator {
	pub fn new(
		resolver: Arc<dyn PathResolverTrait>,
		broker: Arc<dyn QuoteBrokerTrait>,
		providers: Arc<ProviderRegistry>,
		registry: Arc<dyn ChainRegistry>,
		balances: Arc<dyn BalanceOracle>,
	) -> Self {
		Self {
			resolver,
			broker,
			providers,
			registry,
			balances,
			pairs: PairCatalog::default(),
			features: FeatureFlags::default(),
		}
	}

	pub fn with_pairs(mut self, pairs: PairCatalog) -> Self {
		self.pairs = pairs;
		self
	}

	pub fn with_features(mut self, features: FeatureFlags) -> Self {
		self.features = features;
		self
	}

	pub fn providers(&self) -> &ProviderRegistry {
		&self.providers
	}

	fn handler(&self, provider_id: &str) -> SwapResult<Arc<dyn ProviderHandler>> {
		self.providers.get(provider_id).ok_or_else(|| {
			SwapError::internal(format!("No handler registered for provider {provider_id}"))
		})
	}

	/// Drop the top-up alternative when the source balance already covers the swap
	async fn effective_pair(&self, request: &SwapRequest) -> SwapResult<SwapPair> {
		let pair = &request.pair;
		if pair.alternative_asset.is_none() {
			return Ok(pair.clone());
		}
		let asset = self.registry.get_asset(&pair.from)?;
		let balance = self
			.balances
			.get_transferable_balance(&request.address, &asset.origin_chain, &asset.slug)
			.await?;
		if balance.value >= request.from_amount {
			debug!(
				"Balance {} of {} covers the swap, ignoring the alternative asset",
				balance.value, pair.from
			);
			return Ok(pair.without_alternative());
		}
		Ok(pair.clone())
	}

	fn is_cross_chain(&self, pair: &SwapPair) -> SwapResult<bool> {
		let from = self.registry.get_asset(&pair.from)?;
		let to = self.registry.get_asset(&pair.to)?;
		Ok(from.origin_chain != to.origin_chain)
	}

	/// DEFAULT anchor plus one zero-fee step per path action
	fn placeholder_process(&self, path: &SwapPath, request: &SwapRequest) -> SwapResult<SwapProcess> {
		let first = self.registry.get_asset(&path.first().pair.from)?;
		let first_chain = self.registry.get_chain(&first.origin_chain)?;
		let mut builder = SwapProcess::builder(path.clone(), first_chain.native_asset.clone());

		for action in path.actions() {
			let from = self.registry.get_asset(&action.pair.from)?;
			let to = self.registry.get_asset(&action.pair.to)?;
			let fee = StepFeeInfo::zero(first_chain.native_asset.clone());
			match action.kind {
				SwapActionKind::Swap => builder.push(
					format!("Swap on {}", from.origin_chain),
					StepMetadata::Swap(SwapLeg {
						from_asset: from.slug,
						to_asset: to.slug,
						chain: from.origin_chain,
						from_amount: request.from_amount.clone(),
						to_amount: Amount::zero(),
						min_received: Amount::zero(),
					}),
					fee,
				),
				SwapActionKind::Bridge => builder.push(
					format!("Transfer from {} to {}", from.origin_chain, to.origin_chain),
					StepMetadata::Bridge(BridgeLeg {
						from_asset: from.slug,
						to_asset: to.slug,
						from_chain: from.origin_chain,
						to_chain: to.origin_chain,
						amount: request.from_amount.clone(),
						fee_included: false,
						delivery_fee: Amount::zero(),
						sender: request.address.clone(),
						receiver: request.address.clone(),
					}),
					fee,
				),
			}
		}
		builder.build()
	}

	/// Resolve the path, collect quotes and expand the selected quote into a process
	pub async fn plan_swap(&self, request: &SwapRequest) -> SwapResult<SwapPlan> {
		if request.from_amount.is_zero() {
			return Err(SwapError::invalid_params("Swap amount must be greater than zero"));
		}
		if request.pair.from == request.pair.to {
			return Err(SwapError::invalid_params("Cannot swap an asset into itself"));
		}

		let pair = self.effective_pair(request).await?;
		let path = self.resolver.resolve(&pair).await?;
		let is_cross_chain = self.is_cross_chain(&pair)?;

		let quote_pair = match path.swap_action() {
			Some(swap) if !is_cross_chain => swap.pair.clone(),
			_ => pair.without_alternative(),
		};
		let quote_request = QuoteRequest::from_swap_request(request, quote_pair, is_cross_chain);
		let outcome = self.broker.ask_quotes(&quote_request).await;

		let Some(quote) = outcome
			.select(request.preferred_provider.as_deref())
			.cloned()
		else {
			let error = outcome
				.error
				.clone()
				.unwrap_or_else(|| SwapError::new(SwapErrorKind::AssetNotSupported));
			info!("No quote for {}: {}", pair, error);
			return Ok(SwapPlan {
				process: self.placeholder_process(&path, request)?,
				quote: None,
				quotes: outcome.quotes,
				error: Some(error),
			});
		};

		let handler = self.handler(&quote.provider)?;
		let mut planned_request = request.clone();
		planned_request.pair = pair.clone();
		let process = handler
			.generate_process(&path, &planned_request, &quote)
			.await?;
		process.check_consistency()?;

		info!(
			"Planned {} via {}: {} steps, {} -> {}",
			pair,
			quote.provider,
			process.steps.len(),
			quote.from_amount,
			quote.to_amount
		);
		Ok(SwapPlan {
			process,
			quote: Some(quote),
			quotes: outcome.quotes,
			error: None,
		})
	}

	/// Check every step of a planned process, returning at most one error
	pub async fn validate_swap(&self, params: &ValidateSwapParams) -> Vec<SwapError> {
		if self.features.blocks(&params.quote.provider) {
			warn!("Swap via {} is blocked", params.quote.provider);
			return vec![SwapError::new(SwapErrorKind::FeatureBlocked)];
		}
		if params.quote.is_expired() {
			return vec![SwapError::new(SwapErrorKind::QuoteTimeout)];
		}
		if let Err(e) = params.process.check_consistency() {
			return vec![e];
		}
		let handler = match self.handler(&params.quote.provider) {
			Ok(handler) => handler,
			Err(e) => return vec![e],
		};
		handler
			.validate_process(&params.process, &params.request, &params.quote)
			.await
	}

	/// Execute the step at `params.step_index`
	pub async fn submit_step(
		&self,
		params: &SubmitStepParams,
		context: &mut ProcessContext,
	) -> SwapResult<ExecutionResult> {
		if self.features.blocks(&params.quote.provider) {
			return Err(SwapError::new(SwapErrorKind::FeatureBlocked));
		}
		params.quote.ensure_alive()?;
		if !context.belongs_to(&params.process) {
			return Err(SwapError::invalid_params(
				"Signature context belongs to another process",
			));
		}
		let step = params.process.step(params.step_index).ok_or_else(|| {
			SwapError::invalid_params(format!("Step {} does not exist", params.step_index))
		})?;

		let handler = self.handler(&params.quote.provider)?;
		debug!(
			"Submitting step {} ({}) of process {}",
			params.step_index,
			step.step_type(),
			params.process.process_id
		);
		Ok(handler
			.submit_step(step, &params.request, &params.quote, context)
			.await?)
	}

	/// Pairs listed in the static reference map
	pub fn supported_pairs(&self) -> Vec<SwapPair> {
		self.pairs.supported_pairs()
	}

	/// Pay the fees of one step with another of its fee options
	pub fn select_fee_token(
		&self,
		process: &mut SwapProcess,
		step_index: usize,
		token: &str,
	) -> SwapResult<()> {
		process.select_fee_token(step_index, token)
	}
}
