//! Swap processes: the ordered step pipeline for one accepted quote

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
	DynamicSwapAction, FeeComponent, FeeType, ProcessStep, Step, StepFeeInfo, StepMetadata,
	StepType, SwapPath,
};
use crate::errors::{SwapError, SwapResult};
use crate::models::Amount;

/// Ordered pipeline of steps, each paired with its fee info
///
/// `steps[0]` is always a zero-cost DEFAULT anchor, and the bridge/swap steps
/// re-derive exactly the resolved `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapProcess {
	pub process_id: Uuid,
	pub path: SwapPath,
	pub steps: Vec<ProcessStep>,
}

impl SwapProcess {
	pub fn builder(path: SwapPath, default_fee_token: impl Into<String>) -> ProcessBuilder {
		ProcessBuilder::new(path, default_fee_token)
	}

	/// Action sequence re-derived from the steps, ignoring auxiliary steps
	pub fn derived_actions(&self) -> Vec<DynamicSwapAction> {
		self.steps.iter().filter_map(|s| s.step.action()).collect()
	}

	/// Check the anchor and path reconstruction invariants
	pub fn check_consistency(&self) -> SwapResult<()> {
		match self.steps.first() {
			Some(first) if first.step_type() == StepType::Default && first.fee.is_zero() => {},
			_ => {
				return Err(SwapError::internal(
					"Process must start with a zero-cost DEFAULT step",
				))
			},
		}
		if self.derived_actions() != self.path.actions() {
			return Err(SwapError::internal(
				"Process steps do not match the resolved swap path",
			));
		}
		Ok(())
	}

	pub fn step(&self, index: usize) -> Option<&ProcessStep> {
		self.steps.get(index)
	}

	pub fn step_types(&self) -> Vec<StepType> {
		self.steps.iter().map(ProcessStep::step_type).collect()
	}

	/// Fee components summed per (fee type, token) across all steps
	pub fn total_fee(&self) -> Vec<FeeComponent> {
		let mut totals: Vec<FeeComponent> = Vec::new();
		for component in self.steps.iter().flat_map(|s| s.fee.fee_components.iter()) {
			match totals.iter_mut().find(|t| {
				t.fee_type == component.fee_type && t.token_slug == component.token_slug
			}) {
				Some(total) => total.amount += &component.amount,
				None => totals.push(component.clone()),
			}
		}
		totals
	}

	/// Network fees the signer pays in `token` across all steps
	pub fn network_fee_in(&self, token: &str) -> Amount {
		self.total_fee()
			.into_iter()
			.filter(|c| c.fee_type == FeeType::Network && c.token_slug == token)
			.map(|c| c.amount)
			.sum()
	}

	/// Record the fee token chosen for one step
	pub fn select_fee_token(&mut self, step_index: usize, token: &str) -> SwapResult<()> {
		let step = self.steps.get_mut(step_index).ok_or_else(|| {
			SwapError::invalid_params(format!("Step {step_index} does not exist"))
		})?;
		if !step.fee.fee_options.iter().any(|option| option == token) {
			return Err(SwapError::invalid_params(format!(
				"{token} is not a fee option for step {step_index}"
			)));
		}
		step.fee.selected_fee_token = Some(token.to_string());
		Ok(())
	}
}

/// Appends steps in order and seals the process once the invariants hold
#[derive(Debug)]
pub struct ProcessBuilder {
	path: SwapPath,
	steps: Vec<ProcessStep>,
}

impl ProcessBuilder {
	pub fn new(path: SwapPath, default_fee_token: impl Into<String>) -> Self {
		let anchor = ProcessStep {
			step: Step {
				id: 0,
				name: "Fill information".to_string(),
				metadata: StepMetadata::Default,
			},
			fee: StepFeeInfo::zero(default_fee_token),
		};
		Self {
			path,
			steps: vec![anchor],
		}
	}

	pub fn push(&mut self, name: impl Into<String>, metadata: StepMetadata, fee: StepFeeInfo) {
		let id = self.steps.len();
		self.steps.push(ProcessStep {
			step: Step {
				id,
				name: name.into(),
				metadata,
			},
			fee,
		});
	}

	/// Append a generated step, skipping generators that returned "not needed"
	pub fn push_generated(&mut self, generated: Option<(String, StepMetadata, StepFeeInfo)>) {
		if let Some((name, metadata, fee)) = generated {
			self.push(name, metadata, fee);
		}
	}

	pub fn build(self) -> SwapResult<SwapProcess> {
		let process = SwapProcess {
			process_id: Uuid::new_v4(),
			path: self.path,
			steps: self.steps,
		};
		process.check_consistency()?;
		Ok(process)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::errors::SwapErrorKind;
	use crate::swap::SwapLeg;

	fn swap_leg(from: &str, to: &str) -> StepMetadata {
		StepMetadata::Swap(SwapLeg {
			from_asset: from.into(),
			to_asset: to.into(),
			chain: "ethereum".into(),
			from_amount: Amount::from(1000u64),
			to_amount: Amount::from(980u64),
			min_received: Amount::from(975u64),
		})
	}

	fn single_swap_path() -> SwapPath {
		SwapPath::new(vec![DynamicSwapAction::swap("eth-USDC", "eth-WETH")]).unwrap()
	}

	#[test]
	fn test_builder_produces_consistent_process() {
		let mut builder = SwapProcess::builder(single_swap_path(), "eth-ETH");
		builder.push_generated(None);
		builder.push(
			"Swap",
			swap_leg("eth-USDC", "eth-WETH"),
			StepFeeInfo::network(Amount::from(21u64), "eth-ETH"),
		);
		let process = builder.build().unwrap();

		assert_eq!(process.step_types(), vec![StepType::Default, StepType::Swap]);
		assert_eq!(process.derived_actions(), process.path.actions());
		assert_eq!(process.steps[1].step.id, 1);
		assert_eq!(process.network_fee_in("eth-ETH"), Amount::from(21u64));
	}

	#[test]
	fn test_builder_rejects_path_mismatch() {
		let mut builder = SwapProcess::builder(single_swap_path(), "eth-ETH");
		builder.push(
			"Swap",
			swap_leg("eth-USDC", "eth-DAI"),
			StepFeeInfo::zero("eth-ETH"),
		);
		let err = builder.build().unwrap_err();
		assert_eq!(err.kind, SwapErrorKind::InternalError);
	}

	#[test]
	fn test_select_fee_token_requires_known_option() {
		let mut builder = SwapProcess::builder(single_swap_path(), "eth-ETH");
		builder.push(
			"Swap",
			swap_leg("eth-USDC", "eth-WETH"),
			StepFeeInfo::network(Amount::from(21u64), "eth-ETH")
				.with_fee_option("eth-USDC", Amount::from(30u64)),
		);
		let mut process = builder.build().unwrap();

		assert!(process.select_fee_token(1, "eth-USDC").is_ok());
		assert_eq!(process.steps[1].fee.fee_token(), "eth-USDC");
		assert_eq!(
			process.select_fee_token(1, "eth-DAI").unwrap_err().kind,
			SwapErrorKind::InvalidParams
		);
		assert_eq!(
			process.select_fee_token(9, "eth-ETH").unwrap_err().kind,
			SwapErrorKind::InvalidParams
		);
	}
}
