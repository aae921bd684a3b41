//! Substrate hub handler
//!
//! Swaps run on a single Substrate hub chain through its router pallet. When
//! the request names an alternative asset, the path starts with an inbound
//! XCM bridge topping up the spend asset. Fees can be paid in a non-native
//! asset after a SET_FEE_TOKEN step.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use xswap_types::{
	BridgeLeg, ChainFamily, ChainInfo, ProcessContext, ProcessStep, ProviderApi,
	ProviderHandler, ProviderInfo, ProviderResult, QuoteRequest, SetFeeTokenMetadata,
	StepFeeInfo, StepMetadata, SubstrateCall, SwapActionKind, SwapError, SwapErrorKind,
	SwapPath, SwapProcess, SwapQuote, SwapRequest, TransactionPayload,
};

use super::amm::unexpected_step;
use crate::common::{generators, validate_process_steps, ChainServices};

/// Weight units of an XCM `transfer_assets` call
pub const XCM_TRANSFER_UNITS: u64 = 1_000;
/// Weight units of a router `sell` call
pub const ROUTER_SELL_UNITS: u64 = 3_000;
/// Weight units of a `set_currency` call
pub const SET_CURRENCY_UNITS: u64 = 500;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HubQuoteMetadata {
	/// Router hops as returned by the hub's quote endpoint
	#[serde(default)]
	route: serde_json::Value,
	/// Fee-token units per native unit, used to price fees in a non-native token
	#[serde(default)]
	fee_token_rate: Option<Decimal>,
}

/// `polkadotXcm.transfer_assets` call for a bridge leg leaving a Substrate chain
pub(crate) fn xcm_transfer_call(
	leg: &BridgeLeg,
	fee: &StepFeeInfo,
	chain: &ChainInfo,
) -> TransactionPayload {
	TransactionPayload::Substrate(SubstrateCall {
		chain: leg.from_chain.clone(),
		signer: leg.sender.clone(),
		pallet: "polkadotXcm".to_string(),
		call: "transfer_assets".to_string(),
		args: json!({
			"dest": leg.to_chain,
			"beneficiary": leg.receiver,
			"asset": leg.from_asset,
			"amount": leg.amount.to_string(),
			"feeAssetItem": 0,
			"weightLimit": "Unlimited",
		}),
		fee_asset: fee_asset(fee, chain),
	})
}

fn fee_asset(fee: &StepFeeInfo, chain: &ChainInfo) -> Option<String> {
	let token = fee.fee_token();
	(token != chain.native_asset).then(|| token.to_string())
}

pub struct HubHandler {
	info: ProviderInfo,
	api: Arc<dyn ProviderApi>,
	services: ChainServices,
}

impl std::fmt::Debug for HubHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HubHandler")
			.field("info", &self.info)
			.finish_non_exhaustive()
	}
}

impl HubHandler {
	pub fn new(info: ProviderInfo, api: Arc<dyn ProviderApi>, services: ChainServices) -> Self {
		Self {
			info,
			api,
			services,
		}
	}

	/// Fee token requested by the user, when it differs from the chain's native asset
	fn custom_fee_token<'a>(&self, request: &'a SwapRequest, chain: &ChainInfo) -> Option<&'a str> {
		request
			.fee_token
			.as_deref()
			.filter(|token| *token != chain.native_asset)
	}
}

#[async_trait]
impl ProviderHandler for HubHandler {
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
		let swap = path
			.swap_action()
			.filter(|swap| *swap == path.last())
			.ok_or_else(|| SwapError::new(SwapErrorKind::Unsupported))?;
		let (_, chain) = self.services.asset_with_chain(&swap.pair.from)?;
		if chain.family != ChainFamily::Substrate {
			return Err(SwapError::new(SwapErrorKind::Unsupported).into());
		}
		let meta: HubQuoteMetadata = quote.metadata_or_default()?;

		let mut builder = SwapProcess::builder(path.clone(), chain.native_asset.clone());

		for action in path.actions() {
			if action.kind != SwapActionKind::Bridge {
				continue;
			}
			let (_, source_chain) = self.services.asset_with_chain(&action.pair.from)?;
			let shortfall = generators::top_up_shortfall(
				&self.services,
				action,
				&request.address,
				&quote.from_amount,
			)
			.await?;
			let (name, metadata, fee) = generators::bridge_step(
				&self.services,
				&source_chain,
				&chain,
				action,
				&shortfall,
				XCM_TRANSFER_UNITS,
				&request.address,
				&request.address,
			)
			.await?;
			builder.push(name, metadata, fee);
		}

		let params = self.services.fee_parameters(&chain).await?;
		let native_swap_fee = params.estimate(ROUTER_SELL_UNITS);
		let mut swap_fee = match self.custom_fee_token(request, &chain) {
			Some(fee_token) => {
				let rate = meta.fee_token_rate.unwrap_or(Decimal::ONE);
				let fee_amount = native_swap_fee.mul_ratio(rate);
				builder.push(
					format!("Pay fees in {fee_token}"),
					StepMetadata::SetFeeToken(SetFeeTokenMetadata {
						chain: chain.slug.clone(),
						fee_token: fee_token.to_string(),
						fee_amount: fee_amount.clone(),
					}),
					StepFeeInfo::network(
						params.estimate(SET_CURRENCY_UNITS),
						params.fee_token.clone(),
					),
				);
				StepFeeInfo::network(fee_amount, fee_token)
					.with_fee_option(chain.native_asset.clone(), native_swap_fee)
			},
			None => StepFeeInfo::network(native_swap_fee, params.fee_token.clone()),
		};
		swap_fee
			.fee_components
			.extend(generators::protocol_fees(quote));

		let (name, metadata, fee) = generators::swap_step(
			&chain,
			swap,
			&quote.from_amount,
			&quote.to_amount,
			&request.slippage,
			swap_fee,
		);
		builder.push(name, metadata, fee);

		let process = builder.build()?;
		debug!(
			"Generated {} step hub process for {} via {}",
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
			StepMetadata::Bridge(leg) => {
				let chain = self.services.registry.get_chain(&leg.from_chain)?;
				if chain.family != ChainFamily::Substrate {
					return Err(unexpected_step(step));
				}
				Ok(xcm_transfer_call(leg, &step.fee, &chain))
			},
			StepMetadata::SetFeeToken(meta) => {
				Ok(TransactionPayload::Substrate(SubstrateCall {
					chain: meta.chain.clone(),
					signer: request.address.clone(),
					pallet: "multiTransactionPayment".to_string(),
					call: "set_currency".to_string(),
					args: json!({ "currency": meta.fee_token }),
					fee_asset: None,
				}))
			},
			StepMetadata::Swap(leg) => {
				let meta: HubQuoteMetadata = quote.metadata_or_default()?;
				let chain = self.services.registry.get_chain(&leg.chain)?;
				Ok(TransactionPayload::Substrate(SubstrateCall {
					chain: leg.chain.clone(),
					signer: request.address.clone(),
					pallet: "router".to_string(),
					call: "sell".to_string(),
					args: json!({
						"assetIn": leg.from_asset,
						"assetOut": leg.to_asset,
						"amountIn": leg.from_amount.to_string(),
						"minAmountOut": leg.min_received.to_string(),
						"route": meta.route,
					}),
					fee_asset: fee_asset(&step.fee, &chain),
				}))
			},
			_ => Err(unexpected_step(step)),
		}
	}
}
