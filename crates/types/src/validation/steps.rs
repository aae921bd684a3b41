//! Pure per-step validators
//!
//! Inputs are balances fetched beforehand, so every function here is a
//! predicate over plain data and yields at most one error.

use chrono::{DateTime, Utc};

use super::ValidationPolicy;
use crate::errors::{SwapError, SwapErrorKind};
use crate::models::{is_address_for_family, Amount, Asset, ChainFamily};
use crate::swap::{
	BridgeLeg, SetFeeTokenMetadata, StepFeeInfo, StepMetadata, SwapLeg, SwapQuote,
};

/// Balances needed to pay for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendSnapshot {
	/// Transferable balance of the spent asset, including inflows from earlier steps
	pub spend_balance: Amount,
	/// Balance of the fee token when it is not the spent asset
	pub fee_balance: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSnapshot {
	pub spend: SpendSnapshot,
	pub destination_asset: Asset,
	/// Receiver's native account on the destination chain is alive
	pub receiver_native_alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSnapshot {
	pub spend: SpendSnapshot,
	pub destination_asset: Asset,
	/// Family of the chain the final output lands on
	pub destination_family: ChainFamily,
}

/// DEFAULT, TOKEN_APPROVAL and PERMIT only need their metadata to be usable
pub fn validate_structure(metadata: &StepMetadata) -> Option<SwapError> {
	match metadata {
		StepMetadata::TokenApproval(approval) => {
			if approval.spender.is_empty() || approval.token_address.is_empty() {
				return Some(SwapError::internal("Approval step is missing spender or token"));
			}
			None
		},
		StepMetadata::Permit(permit) => {
			if !permit.typed_data.is_object() {
				return Some(SwapError::internal("Permit step is missing typed data"));
			}
			None
		},
		_ => None,
	}
}

fn check_expiry(quote: &SwapQuote, now: DateTime<Utc>) -> Option<SwapError> {
	quote
		.is_expired_at(now)
		.then(|| SwapError::new(SwapErrorKind::QuoteTimeout))
}

/// Spend plus fee sufficiency shared by BRIDGE and SWAP
///
/// When the fee token is the spent asset, the fee comes out of the same
/// balance unless it was already folded into `amount`.
fn check_spend(
	spend_asset: &str,
	amount: &Amount,
	fee_in_amount: bool,
	fee: &StepFeeInfo,
	spend: &SpendSnapshot,
) -> Option<SwapError> {
	if spend.spend_balance < *amount {
		return Some(SwapError::with_message(
			SwapErrorKind::NotEnoughBalance,
			format!(
				"Insufficient {spend_asset}: need {amount}, have {}",
				spend.spend_balance
			),
		));
	}

	let charged = fee.charged_amount();
	if fee.fee_token() == spend_asset {
		let required = if fee_in_amount {
			amount.clone()
		} else {
			amount + &charged
		};
		if spend.spend_balance < required {
			return Some(SwapError::with_message(
				SwapErrorKind::NotEnoughBalance,
				format!(
					"Insufficient {spend_asset} for amount plus fee: need {required}, have {}",
					spend.spend_balance
				),
			));
		}
	} else {
		let available = spend.fee_balance.clone().unwrap_or_default();
		if available < charged {
			return Some(SwapError::with_message(
				SwapErrorKind::NotEnoughBalance,
				format!(
					"Insufficient {} to pay fees: need {charged}, have {available}",
					fee.fee_token()
				),
			));
		}
	}
	None
}

pub fn validate_bridge_step(
	leg: &BridgeLeg,
	fee: &StepFeeInfo,
	quote: &SwapQuote,
	snapshot: &BridgeSnapshot,
	policy: &ValidationPolicy,
	now: DateTime<Utc>,
) -> Option<SwapError> {
	if let Some(err) = check_expiry(quote, now) {
		return Some(err);
	}

	let self_paid = fee.fee_token() == leg.from_asset;
	if let Some(err) = check_spend(
		&leg.from_asset,
		&leg.amount,
		self_paid && leg.fee_included,
		fee,
		&snapshot.spend,
	) {
		return Some(err);
	}

	let received = if self_paid && leg.fee_included {
		leg.amount.saturating_sub(&fee.charged_amount())
	} else {
		leg.amount.clone()
	};
	let min_delivery = &policy.min_viable(&snapshot.destination_asset) + &leg.delivery_fee;
	if received < min_delivery {
		return Some(SwapError::with_message(
			SwapErrorKind::NotEnoughExistentialDeposit,
			format!(
				"Bridged amount {received} of {} is below the minimum {min_delivery} on {}",
				leg.to_asset, leg.to_chain
			),
		));
	}

	if !snapshot.destination_asset.keeps_account_alive() && !snapshot.receiver_native_alive {
		return Some(SwapError::new(
			SwapErrorKind::ReceiverNotEnoughExistentialDeposit,
		));
	}
	None
}

pub fn validate_swap_step(
	leg: &SwapLeg,
	fee: &StepFeeInfo,
	quote: &SwapQuote,
	recipient: Option<&str>,
	snapshot: &SwapSnapshot,
	policy: &ValidationPolicy,
	now: DateTime<Utc>,
) -> Option<SwapError> {
	if let Some(err) = check_expiry(quote, now) {
		return Some(err);
	}

	if let Some(err) = check_spend(&leg.from_asset, &leg.from_amount, false, fee, &snapshot.spend)
	{
		return Some(err);
	}

	if let Some(min_swap) = &quote.min_swap {
		if leg.from_amount <= *min_swap {
			return Some(SwapError::with_message(
				SwapErrorKind::NotMeetMinSwap,
				format!("Swap amount must be greater than {min_swap}"),
			));
		}
	}

	let min_viable = policy.min_viable(&snapshot.destination_asset);
	if leg.to_amount <= min_viable {
		return Some(SwapError::with_message(
			SwapErrorKind::NotEnoughExistentialDeposit,
			format!(
				"Expected {} of {} must be greater than {min_viable}",
				leg.to_amount, leg.to_asset
			),
		));
	}

	if let Some(recipient) = recipient {
		if !is_address_for_family(recipient, snapshot.destination_family) {
			return Some(SwapError::with_message(
				SwapErrorKind::InvalidRecipient,
				format!(
					"Recipient is not a valid {} address",
					snapshot.destination_family
				),
			));
		}
	}
	None
}

pub fn validate_set_fee_token_step(
	metadata: &SetFeeTokenMetadata,
	fee_token_balance: &Amount,
) -> Option<SwapError> {
	(*fee_token_balance <= metadata.fee_amount).then(|| {
		SwapError::with_message(
			SwapErrorKind::NotEnoughBalance,
			format!(
				"Insufficient {} to pay fees: need more than {}, have {fee_token_balance}",
				metadata.fee_token, metadata.fee_amount
			),
		)
	})
}
