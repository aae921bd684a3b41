//! Step validation: policy constants and pure per-step predicates

pub mod policy;
pub mod steps;

pub use policy::ValidationPolicy;
pub use steps::{
	validate_bridge_step, validate_set_fee_token_step, validate_structure, validate_swap_step,
	BridgeSnapshot, SpendSnapshot, SwapSnapshot,
};
