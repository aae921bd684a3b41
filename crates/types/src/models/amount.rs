//! Arbitrary-precision token amounts in an asset's smallest unit

use num_bigint::BigUint;
use num_traits::{CheckedSub, Zero};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

use super::Slippage;

/// Token amount in the smallest unit of its asset
///
/// Serialized as a decimal string so values larger than any native integer
/// survive JSON round trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(BigUint);

impl Amount {
	pub fn new(value: BigUint) -> Self {
		Self(value)
	}

	pub fn zero() -> Self {
		Self(BigUint::zero())
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	pub fn as_biguint(&self) -> &BigUint {
		&self.0
	}

	/// Subtract, returning `None` when the result would be negative
	pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
		self.0.checked_sub(&other.0).map(Amount)
	}

	/// Subtract, clamping at zero
	pub fn saturating_sub(&self, other: &Amount) -> Amount {
		self.checked_sub(other).unwrap_or_default()
	}

	/// Multiply by a non-negative decimal ratio, rounding down
	pub fn mul_ratio(&self, ratio: rust_decimal::Decimal) -> Amount {
		if ratio.is_sign_negative() || ratio.is_zero() {
			return Amount::zero();
		}
		let mantissa = BigUint::from(ratio.mantissa().unsigned_abs());
		let scale = BigUint::from(10u32).pow(ratio.scale());
		Amount((&self.0 * mantissa) / scale)
	}

	/// Minimum amount received after slippage: `floor(self * (1 - slippage))`
	pub fn min_received(&self, slippage: &Slippage) -> Amount {
		self.mul_ratio(slippage.remaining_ratio())
	}

	/// Try to narrow to u128 (for wire formats that need native integers)
	pub fn to_u128(&self) -> Option<u128> {
		u128::try_from(&self.0).ok()
	}
}

/// Error raised when parsing an amount from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid amount '{0}': must be a non-empty string of decimal digits")]
pub struct ParseAmountError(pub String);

impl FromStr for Amount {
	type Err = ParseAmountError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
			return Err(ParseAmountError(s.to_string()));
		}
		BigUint::from_str(s)
			.map(Amount)
			.map_err(|_| ParseAmountError(s.to_string()))
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u64> for Amount {
	fn from(value: u64) -> Self {
		Self(BigUint::from(value))
	}
}

impl From<u128> for Amount {
	fn from(value: u128) -> Self {
		Self(BigUint::from(value))
	}
}

impl From<BigUint> for Amount {
	fn from(value: BigUint) -> Self {
		Self(value)
	}
}

impl Add for Amount {
	type Output = Amount;

	fn add(self, rhs: Amount) -> Amount {
		Amount(self.0 + rhs.0)
	}
}

impl<'a> Add<&'a Amount> for &'a Amount {
	type Output = Amount;

	fn add(self, rhs: &'a Amount) -> Amount {
		Amount(&self.0 + &rhs.0)
	}
}

impl AddAssign<&Amount> for Amount {
	fn add_assign(&mut self, rhs: &Amount) {
		self.0 += &rhs.0;
	}
}

impl Mul<u64> for &Amount {
	type Output = Amount;

	fn mul(self, rhs: u64) -> Amount {
		Amount(&self.0 * BigUint::from(rhs))
	}
}

impl std::iter::Sum for Amount {
	fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
		iter.fold(Amount::zero(), |acc, x| acc + x)
	}
}

impl serde::Serialize for Amount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.0.to_string())
	}
}

impl<'de> serde::Deserialize<'de> for Amount {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		Amount::from_str(&value).map_err(serde::de::Error::custom)
	}
}
