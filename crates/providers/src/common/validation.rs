//! Validation context: fetch what a step needs, then run the pure validator
//!
//! Steps are walked in order and the walk stops at the first failure.
//! Amounts delivered by earlier bridge steps are credited to the balances
//! later steps spend from.

use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;
use xswap_types::validation::{
	validate_bridge_step, validate_set_fee_token_step, validate_structure, validate_swap_step,
	BridgeSnapshot, SpendSnapshot, SwapSnapshot,
};
use xswap_types::{
	Amount, BridgeLeg, ProviderError, ProviderResult, SetFeeTokenMetadata, StepFeeInfo, StepMetadata, SwapError,
	SwapLeg, SwapProcess, SwapQuote, SwapRequest,
};

use super::ChainServices;

/// Validate every step of `process`, returning the first failure if any
pub async fn validate_process_steps(
	services: &ChainServices,
	process: &SwapProcess,
	request: &SwapRequest,
	quote: &SwapQuote,
) -> Vec<SwapError> {
	let mut ctx = ValidationContext {
		services,
		request,
		quote,
		inflows: HashMap::new(),
	};

	for process_step in &process.steps {
		let outcome = match &process_step.step.metadata {
			StepMetadata::Bridge(leg) => ctx.bridge(leg, &process_step.fee).await,
			StepMetadata::Swap(leg) => ctx.swap(leg, &process_step.fee).await,
			StepMetadata::SetFeeToken(meta) => ctx.set_fee_token(meta).await,
			other => Ok(validate_structure(other)),
		};
		let error = match outcome {
			Ok(error) => error,
			Err(err) => Some(SwapError::from(err)),
		};
		if let Some(error) = error {
			debug!(
				"Step {} ({}) failed validation: {}",
				process_step.step.id,
				process_step.step_type(),
				error
			);
			return vec![error];
		}
	}
	Vec::new()
}

struct ValidationContext<'a> {
	services: &'a ChainServices,
	request: &'a SwapRequest,
	quote: &'a SwapQuote,
	/// Pending credits per asset from earlier bridge steps
	inflows: HashMap<String, Amount>,
}

impl ValidationContext<'_> {
	async fn transferable(&self, address: &str, chain: &str, asset: &str) -> ProviderResult<Amount> {
		let balance = self
			.services
			.balances
			.get_transferable_balance(address, chain, asset)
			.await?;
		let inflow = self.inflows.get(asset).cloned().unwrap_or_default();
		Ok(balance.value + inflow)
	}

	/// Spend-asset balance and, when fees use another token, the fee-token balance
	async fn spend_snapshot(
		&self,
		address: &str,
		chain: &str,
		spend_asset: &str,
		fee: &StepFeeInfo,
	) -> ProviderResult<SpendSnapshot> {
		let fee_token = fee.fee_token();
		let spend = self.transferable(address, chain, spend_asset);
		let fee_balance = async {
			if fee_token == spend_asset {
				Ok(None)
			} else {
				self.transferable(address, chain, fee_token).await.map(Some)
			}
		};
		let (spend_balance, fee_balance) = futures::try_join!(spend, fee_balance)?;
		Ok(SpendSnapshot {
			spend_balance,
			fee_balance,
		})
	}

	async fn bridge(
		&mut self,
		leg: &BridgeLeg,
		fee: &StepFeeInfo,
	) -> ProviderResult<Option<SwapError>> {
		let (destination_asset, destination_chain) =
			self.services.asset_with_chain(&leg.to_asset)?;

		let spend = self.spend_snapshot(&leg.sender, &leg.from_chain, &leg.from_asset, fee);
		let receiver_native = self.services.balances.get_transferable_balance(
			&leg.receiver,
			&destination_chain.slug,
			&destination_chain.native_asset,
		);
		let (spend, receiver_native) = futures::try_join!(spend, async {
			receiver_native.await.map_err(ProviderError::from)
		})?;

		let snapshot = BridgeSnapshot {
			spend,
			destination_asset,
			receiver_native_alive: receiver_native.is_alive(),
		};
		let error = validate_bridge_step(
			leg,
			fee,
			self.quote,
			&snapshot,
			&self.services.policy,
			Utc::now(),
		);

		if error.is_none() {
			let received = if leg.fee_included {
				leg.amount.saturating_sub(&fee.charged_amount())
			} else {
				leg.amount.clone()
			}
			.saturating_sub(&leg.delivery_fee);
			*self.inflows.entry(leg.to_asset.clone()).or_default() += &received;
		}
		Ok(error)
	}

	async fn swap(&mut self, leg: &SwapLeg, fee: &StepFeeInfo) -> ProviderResult<Option<SwapError>> {
		let destination_asset = self.services.registry.get_asset(&leg.to_asset)?;
		let (_, final_chain) = self.services.asset_with_chain(&self.request.pair.to)?;

		let spend = self
			.spend_snapshot(&self.request.address, &leg.chain, &leg.from_asset, fee)
			.await?;
		let snapshot = SwapSnapshot {
			spend,
			destination_asset,
			destination_family: final_chain.family,
		};
		let error = validate_swap_step(
			leg,
			fee,
			self.quote,
			self.request.recipient.as_deref(),
			&snapshot,
			&self.services.policy,
			Utc::now(),
		);

		if error.is_none() {
			*self.inflows.entry(leg.to_asset.clone()).or_default() += &leg.min_received;
		}
		Ok(error)
	}

	async fn set_fee_token(
		&mut self,
		meta: &SetFeeTokenMetadata,
	) -> ProviderResult<Option<SwapError>> {
		let balance = self
			.transferable(&self.request.address, &meta.chain, &meta.fee_token)
			.await?;
		Ok(validate_set_fee_token_step(meta, &balance))
	}
}
