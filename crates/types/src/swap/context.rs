//! Per-process signature context
//!
//! Off-chain signatures produced by a PERMIT step are recorded here and
//! consumed by the relay step that follows. The context lives exactly as long
//! as the process it belongs to.

use std::collections::HashMap;
use uuid::Uuid;

use super::{StepType, SwapProcess};
use crate::errors::{SwapError, SwapResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessContext {
	process_id: Uuid,
	signatures: HashMap<StepType, String>,
}

impl ProcessContext {
	pub fn new(process_id: Uuid) -> Self {
		Self {
			process_id,
			signatures: HashMap::new(),
		}
	}

	pub fn for_process(process: &SwapProcess) -> Self {
		Self::new(process.process_id)
	}

	pub fn process_id(&self) -> Uuid {
		self.process_id
	}

	pub fn belongs_to(&self, process: &SwapProcess) -> bool {
		self.process_id == process.process_id
	}

	/// Store the signature produced by `step_type`; each step signs once
	pub fn record_signature(
		&mut self,
		step_type: StepType,
		signature: impl Into<String>,
	) -> SwapResult<()> {
		if self.signatures.contains_key(&step_type) {
			return Err(SwapError::invalid_params(format!(
				"Signature for {step_type} already recorded in process {}",
				self.process_id
			)));
		}
		self.signatures.insert(step_type, signature.into());
		Ok(())
	}

	pub fn signature(&self, step_type: StepType) -> Option<&str> {
		self.signatures.get(&step_type).map(String::as_str)
	}

	/// Consume a recorded signature
	pub fn take_signature(&mut self, step_type: StepType) -> Option<String> {
		self.signatures.remove(&step_type)
	}
}
