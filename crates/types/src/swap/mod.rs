//! Swap pipeline models: pairs, paths, quotes, steps and processes

pub mod context;
pub mod fee;
pub mod pair;
pub mod path;
pub mod payload;
pub mod process;
pub mod quote;
pub mod request;
pub mod step;

pub use context::ProcessContext;
pub use fee::{FeeComponent, FeeType, StepFeeInfo};
pub use pair::{DynamicSwapAction, SwapActionKind, SwapPair};
pub use path::{PathError, SwapPath, MAX_PATH_ACTIONS};
pub use payload::{
	EvmTransaction, ExecutionResult, OffChainOrder, OffChainSignRequest, SubstrateCall,
	TransactionPayload,
};
pub use process::{ProcessBuilder, SwapProcess};
pub use quote::SwapQuote;
pub use request::{SubmitStepParams, SwapRequest, ValidateSwapParams};
pub use step::{
	ApprovalMetadata, BridgeLeg, PermitMetadata, ProcessStep, SetFeeTokenMetadata, Step,
	StepMetadata, StepType, SwapLeg,
};
