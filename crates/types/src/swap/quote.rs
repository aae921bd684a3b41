//! Time-bounded provider quotes

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{StepFeeInfo, SwapPair};
use crate::errors::{SwapError, SwapErrorKind, SwapResult};
use crate::models::Amount;

/// Price and fee commitment from one provider for one swap size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
	pub id: Uuid,
	pub provider: String,
	pub pair: SwapPair,
	pub from_amount: Amount,
	pub to_amount: Amount,
	/// Human-unit exchange rate as reported by the provider
	pub rate: Decimal,
	pub fee_info: StepFeeInfo,
	/// Expiry; filled with the provider-class default by the broker when absent
	#[serde(default)]
	pub alive_until: Option<DateTime<Utc>>,
	/// Provider floor, the swapped amount must be strictly above it
	#[serde(default)]
	pub min_swap: Option<Amount>,
	#[serde(default)]
	pub estimated_arrival_secs: Option<u64>,
	/// Opaque provider data consumed by the matching handler
	#[serde(default)]
	pub metadata: serde_json::Value,
}

impl SwapQuote {
	pub fn new(
		provider: impl Into<String>,
		pair: SwapPair,
		from_amount: Amount,
		to_amount: Amount,
		fee_info: StepFeeInfo,
	) -> Self {
		Self {
			id: Uuid::new_v4(),
			provider: provider.into(),
			pair,
			from_amount,
			to_amount,
			rate: Decimal::ZERO,
			fee_info,
			alive_until: None,
			min_swap: None,
			estimated_arrival_secs: None,
			metadata: serde_json::Value::Null,
		}
	}

	pub fn with_alive_until(mut self, alive_until: DateTime<Utc>) -> Self {
		self.alive_until = Some(alive_until);
		self
	}

	pub fn with_min_swap(mut self, min_swap: Amount) -> Self {
		self.min_swap = Some(min_swap);
		self
	}

	pub fn with_rate(mut self, rate: Decimal) -> Self {
		self.rate = rate;
		self
	}

	pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
		self.metadata = metadata;
		self
	}

	/// Fill in the expiry if the provider did not send one
	pub fn ensure_alive_until(&mut self, default_ttl: Duration, now: DateTime<Utc>) {
		if self.alive_until.is_none() {
			self.alive_until = Some(now + default_ttl);
		}
	}

	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		matches!(self.alive_until, Some(alive_until) if now >= alive_until)
	}

	pub fn is_expired(&self) -> bool {
		self.is_expired_at(Utc::now())
	}

	/// Err(QUOTE_TIMEOUT) once the quote has expired
	pub fn ensure_alive(&self) -> SwapResult<()> {
		if self.is_expired() {
			return Err(SwapError::new(SwapErrorKind::QuoteTimeout));
		}
		Ok(())
	}

	/// Decode the provider metadata into a handler-specific shape
	pub fn metadata_as<T: serde::de::DeserializeOwned>(&self) -> SwapResult<T> {
		serde_json::from_value(self.metadata.clone()).map_err(|e| {
			SwapError::internal(format!(
				"Malformed quote metadata from {}: {}",
				self.provider, e
			))
		})
	}

	/// Like [`Self::metadata_as`], with absent metadata decoding to the default
	pub fn metadata_or_default<T: serde::de::DeserializeOwned + Default>(&self) -> SwapResult<T> {
		if self.metadata.is_null() {
			return Ok(T::default());
		}
		self.metadata_as()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn quote() -> SwapQuote {
		SwapQuote::new(
			"uniswap",
			SwapPair::new("eth-USDC", "eth-WETH"),
			Amount::from(1000u64),
			Amount::from(980u64),
			StepFeeInfo::zero("eth-ETH"),
		)
	}

	#[test]
	fn test_expiry_is_inclusive() {
		let now = Utc::now();
		let q = quote().with_alive_until(now);
		assert!(q.is_expired_at(now));
		assert!(!q.is_expired_at(now - Duration::seconds(1)));
	}

	#[test]
	fn test_quote_without_expiry_never_expires_until_defaulted() {
		let mut q = quote();
		assert!(!q.is_expired());

		let now = Utc::now();
		q.ensure_alive_until(Duration::seconds(30), now);
		assert_eq!(q.alive_until, Some(now + Duration::seconds(30)));

		// An explicit expiry is never overwritten
		q.ensure_alive_until(Duration::seconds(600), now);
		assert_eq!(q.alive_until, Some(now + Duration::seconds(30)));
	}

	#[test]
	fn test_ensure_alive_reports_timeout() {
		let q = quote().with_alive_until(Utc::now() - Duration::seconds(5));
		assert_eq!(q.ensure_alive().unwrap_err().kind, SwapErrorKind::QuoteTimeout);
	}
}
