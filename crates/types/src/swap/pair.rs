//! Swap pairs and abstract path actions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversion intent between two registry assets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapPair {
	pub from: String,
	pub to: String,
	/// Same-value asset on another chain usable to top up `from` via a bridge leg
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub alternative_asset: Option<String>,
}

impl SwapPair {
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			alternative_asset: None,
		}
	}

	pub fn with_alternative(mut self, alternative: impl Into<String>) -> Self {
		self.alternative_asset = Some(alternative.into());
		self
	}

	/// Same pair without the top-up alternative
	pub fn without_alternative(&self) -> Self {
		Self::new(self.from.clone(), self.to.clone())
	}

	/// Stable key used by pair discovery (`from___to`)
	pub fn slug(&self) -> String {
		format!("{}___{}", self.from, self.to)
	}
}

impl fmt::Display for SwapPair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} -> {}", self.from, self.to)
	}
}

/// Kind of an abstract path action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapActionKind {
	Swap,
	Bridge,
}

/// One hop of a swap path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DynamicSwapAction {
	pub kind: SwapActionKind,
	pub pair: SwapPair,
}

impl DynamicSwapAction {
	pub fn swap(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			kind: SwapActionKind::Swap,
			pair: SwapPair::new(from, to),
		}
	}

	pub fn bridge(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			kind: SwapActionKind::Bridge,
			pair: SwapPair::new(from, to),
		}
	}
}
