//! Validated swap paths

use serde::{Deserialize, Serialize};

use super::{DynamicSwapAction, SwapActionKind};

/// Maximum number of actions in a path
pub const MAX_PATH_ACTIONS: usize = 3;

/// Reasons a sequence of actions is not a usable path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
	#[error("Path is empty")]
	Empty,

	#[error("Path has {0} actions, at most {MAX_PATH_ACTIONS} are allowed")]
	TooLong(usize),

	#[error("Action {index} starts at {found} but the previous action ends at {expected}")]
	Disconnected {
		index: usize,
		expected: String,
		found: String,
	},

	#[error("Path contains more than one swap action")]
	MultipleSwaps,
}

/// Ordered, connected sequence of 1 to 3 actions with at most one swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SwapPath(Vec<DynamicSwapAction>);

impl SwapPath {
	pub fn new(actions: Vec<DynamicSwapAction>) -> Result<Self, PathError> {
		if actions.is_empty() {
			return Err(PathError::Empty);
		}
		if actions.len() > MAX_PATH_ACTIONS {
			return Err(PathError::TooLong(actions.len()));
		}
		for (index, pair) in actions.windows(2).enumerate() {
			if pair[0].pair.to != pair[1].pair.from {
				return Err(PathError::Disconnected {
					index: index + 1,
					expected: pair[0].pair.to.clone(),
					found: pair[1].pair.from.clone(),
				});
			}
		}
		let swaps = actions
			.iter()
			.filter(|a| a.kind == SwapActionKind::Swap)
			.count();
		if swaps > 1 {
			return Err(PathError::MultipleSwaps);
		}
		// Actions never carry a top-up alternative of their own
		let actions = actions
			.into_iter()
			.map(|mut action| {
				action.pair.alternative_asset = None;
				action
			})
			.collect();
		Ok(Self(actions))
	}

	pub fn actions(&self) -> &[DynamicSwapAction] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn first(&self) -> &DynamicSwapAction {
		&self.0[0]
	}

	pub fn last(&self) -> &DynamicSwapAction {
		&self.0[self.0.len() - 1]
	}

	/// The single swap action, if the path has one
	pub fn swap_action(&self) -> Option<&DynamicSwapAction> {
		self.0.iter().find(|a| a.kind == SwapActionKind::Swap)
	}

	pub fn has_bridge(&self) -> bool {
		self.0.iter().any(|a| a.kind == SwapActionKind::Bridge)
	}
}

impl<'de> Deserialize<'de> for SwapPath {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let actions = Vec::<DynamicSwapAction>::deserialize(deserializer)?;
		SwapPath::new(actions).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_connected_path() {
		let path = SwapPath::new(vec![
			DynamicSwapAction::bridge("statemint-USDT", "hydradx-USDT"),
			DynamicSwapAction::swap("hydradx-USDT", "hydradx-DOT"),
		])
		.unwrap();
		assert_eq!(path.len(), 2);
		assert!(path.has_bridge());
		assert_eq!(path.swap_action().unwrap().pair.to, "hydradx-DOT");
	}

	#[test]
	fn test_rejects_malformed_paths() {
		assert_eq!(SwapPath::new(vec![]), Err(PathError::Empty));

		let disconnected = SwapPath::new(vec![
			DynamicSwapAction::bridge("a", "b"),
			DynamicSwapAction::swap("c", "d"),
		]);
		assert!(matches!(disconnected, Err(PathError::Disconnected { index: 1, .. })));

		let two_swaps = SwapPath::new(vec![
			DynamicSwapAction::swap("a", "b"),
			DynamicSwapAction::swap("b", "c"),
		]);
		assert_eq!(two_swaps, Err(PathError::MultipleSwaps));

		let too_long = SwapPath::new(vec![
			DynamicSwapAction::bridge("a", "b"),
			DynamicSwapAction::swap("b", "c"),
			DynamicSwapAction::bridge("c", "d"),
			DynamicSwapAction::bridge("d", "e"),
		]);
		assert_eq!(too_long, Err(PathError::TooLong(4)));
	}

	#[test]
	fn test_deserialize_validates() {
		let json = r#"[{"kind":"SWAP","pair":{"from":"a","to":"b"}},{"kind":"SWAP","pair":{"from":"b","to":"c"}}]"#;
		assert!(serde_json::from_str::<SwapPath>(json).is_err());
	}
}
