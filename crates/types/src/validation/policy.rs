//! Safety margins applied to existential deposits

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Amount, Asset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
	/// Margin over an asset's minimum for the amount a receiver must get
	pub ed_multiplier: Decimal,
	/// Margin over the minimum added to a top-up when the destination account is not alive
	pub top_up_multiplier: Decimal,
}

impl Default for ValidationPolicy {
	fn default() -> Self {
		Self {
			ed_multiplier: Decimal::new(12, 1),
			top_up_multiplier: Decimal::TWO,
		}
	}
}

impl ValidationPolicy {
	/// Smallest amount of `asset` worth delivering to an account
	pub fn min_viable(&self, asset: &Asset) -> Amount {
		asset.min_amount.mul_ratio(self.ed_multiplier)
	}

	/// Extra top-up needed to bring a dead destination account alive
	pub fn top_up_margin(&self, asset: &Asset) -> Amount {
		asset.min_amount.mul_ratio(self.top_up_multiplier)
	}
}
