//! Per-step generators
//!
//! Each generator returns the step it produced, or `None` when the step is
//! not needed (an allowance already covers the spend, for instance). Only
//! collaborator failures are errors.

use tracing::debug;
use xswap_types::{
	Amount, ApprovalMetadata, Asset, BridgeLeg, ChainFamily, ChainInfo, DynamicSwapAction,
	FeeComponent, FeeType, ProviderResult, Slippage, StepFeeInfo, StepMetadata, SwapError,
	SwapLeg, SwapQuote,
};

use super::evm::APPROVAL_GAS;
use super::ChainServices;

/// Step produced by a generator: name, metadata and fee
pub type GeneratedStep = (String, StepMetadata, StepFeeInfo);

/// TOKEN_APPROVAL for an ERC20 spend, skipped when the allowance covers it
pub async fn approval_step(
	services: &ChainServices,
	chain: &ChainInfo,
	asset: &Asset,
	owner: &str,
	spender: &str,
	amount: &Amount,
) -> ProviderResult<Option<GeneratedStep>> {
	if chain.family != ChainFamily::Evm || asset.is_native {
		return Ok(None);
	}
	let token_address = asset.contract_address.clone().ok_or_else(|| {
		SwapError::internal(format!("Asset {} has no contract address", asset.slug))
	})?;

	let allowance = services
		.rpc
		.get_allowance(&chain.slug, &token_address, owner, spender)
		.await?;
	if allowance >= *amount {
		debug!(
			"Allowance {} of {} covers {}, skipping approval",
			allowance, asset.symbol, amount
		);
		return Ok(None);
	}

	let params = services.fee_parameters(chain).await?;
	let fee = StepFeeInfo::network(params.estimate(APPROVAL_GAS), params.fee_token);
	let metadata = StepMetadata::TokenApproval(ApprovalMetadata {
		chain: chain.slug.clone(),
		token_slug: asset.slug.clone(),
		token_address,
		spender: spender.to_string(),
		amount: amount.clone(),
	});
	Ok(Some((format!("Approve {}", asset.symbol), metadata, fee)))
}

/// Protocol fees from the quote, carried on the step that incurs them
pub fn protocol_fees(quote: &SwapQuote) -> Vec<FeeComponent> {
	quote
		.fee_info
		.fee_components
		.iter()
		.filter(|c| c.fee_type == FeeType::Protocol)
		.cloned()
		.collect()
}

/// SWAP step for one path action
pub fn swap_step(
	chain: &ChainInfo,
	action: &DynamicSwapAction,
	from_amount: &Amount,
	to_amount: &Amount,
	slippage: &Slippage,
	fee: StepFeeInfo,
) -> GeneratedStep {
	let metadata = StepMetadata::Swap(SwapLeg {
		from_asset: action.pair.from.clone(),
		to_asset: action.pair.to.clone(),
		chain: chain.slug.clone(),
		from_amount: from_amount.clone(),
		to_amount: to_amount.clone(),
		min_received: to_amount.min_received(slippage),
	});
	(format!("Swap on {}", chain.slug), metadata, fee)
}

/// Network fee for `units` on `chain`, plus the quote's protocol fees
pub async fn network_fee(
	services: &ChainServices,
	chain: &ChainInfo,
	units: u64,
	protocol: Vec<FeeComponent>,
) -> ProviderResult<StepFeeInfo> {
	let params = services.fee_parameters(chain).await?;
	let mut fee = StepFeeInfo::network(params.estimate(units), params.fee_token);
	fee.fee_components.extend(protocol);
	Ok(fee)
}

/// BRIDGE step moving `nominal` of the action's asset
///
/// When the fee is paid in the moved asset itself, it is added on top of the
/// nominal amount so the receiver still gets `nominal`.
#[allow(clippy::too_many_arguments)]
pub async fn bridge_step(
	services: &ChainServices,
	from_chain: &ChainInfo,
	to_chain: &ChainInfo,
	action: &DynamicSwapAction,
	nominal: &Amount,
	units: u64,
	sender: &str,
	receiver: &str,
) -> ProviderResult<GeneratedStep> {
	let params = services.fee_parameters(from_chain).await?;
	let fee_amount = params.estimate(units);
	let self_paid = params.fee_token == action.pair.from;
	let amount = if self_paid {
		nominal + &fee_amount
	} else {
		nominal.clone()
	};

	let metadata = StepMetadata::Bridge(BridgeLeg {
		from_asset: action.pair.from.clone(),
		to_asset: action.pair.to.clone(),
		from_chain: from_chain.slug.clone(),
		to_chain: to_chain.slug.clone(),
		amount,
		fee_included: self_paid,
		delivery_fee: params.delivery_fee,
		sender: sender.to_string(),
		receiver: receiver.to_string(),
	});
	let fee = StepFeeInfo::network(fee_amount, params.fee_token);
	Ok((
		format!("Transfer from {} to {}", from_chain.slug, to_chain.slug),
		metadata,
		fee,
	))
}

/// Amount a top-up bridge must deliver so `owner` holds `needed` on the destination
///
/// A destination account that is not alive also needs the keep-alive margin.
pub async fn top_up_shortfall(
	services: &ChainServices,
	action: &DynamicSwapAction,
	owner: &str,
	needed: &Amount,
) -> ProviderResult<Amount> {
	let (dest_asset, dest_chain) = services.asset_with_chain(&action.pair.to)?;
	let balance = services
		.balances
		.get_transferable_balance(owner, &dest_chain.slug, &dest_asset.slug)
		.await?;

	let mut shortfall = needed.saturating_sub(&balance.value);
	if !balance.is_alive() {
		shortfall += &services.policy.top_up_margin(&dest_asset);
	}
	debug!(
		"Top-up of {} needs {} (balance {}, needed {})",
		dest_asset.slug, shortfall, balance.value, needed
	);
	Ok(shortfall)
}
