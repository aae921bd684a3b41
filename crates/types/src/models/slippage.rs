//! Slippage tolerance as an exact decimal fraction

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Slippage tolerance in `[0, 1)` (0.005 = 0.5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Slippage(Decimal);

/// Error raised for slippage values outside `[0, 1)`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid slippage tolerance: {0} (must be in [0, 1))")]
pub struct InvalidSlippage(pub Decimal);

impl Slippage {
	pub fn new(value: Decimal) -> Result<Self, InvalidSlippage> {
		if value.is_sign_negative() || value >= Decimal::ONE {
			return Err(InvalidSlippage(value));
		}
		Ok(Self(value))
	}

	pub fn zero() -> Self {
		Self(Decimal::ZERO)
	}

	pub fn value(&self) -> Decimal {
		self.0
	}

	/// `1 - slippage`
	pub fn remaining_ratio(&self) -> Decimal {
		Decimal::ONE - self.0
	}
}

impl Default for Slippage {
	fn default() -> Self {
		Self::zero()
	}
}

impl TryFrom<Decimal> for Slippage {
	type Error = InvalidSlippage;

	fn try_from(value: Decimal) -> Result<Self, Self::Error> {
		Slippage::new(value)
	}
}

impl From<Slippage> for Decimal {
	fn from(value: Slippage) -> Self {
		value.0
	}
}
