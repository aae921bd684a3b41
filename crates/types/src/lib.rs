//! xswap Types
//!
//! Shared models and traits for the xswap orchestration core.
//! Domain models, the error taxonomy, collaborator traits and the provider
//! handler contract live here so every other crate speaks the same language.

pub mod errors;
pub mod models;
pub mod oracles;
pub mod providers;
pub mod swap;
pub mod validation;

#[cfg(any(test, feature = "mocks"))]
pub mod test_utils;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use errors::{OracleError, OracleResult, SwapError, SwapErrorKind, SwapResult};

pub use models::{
	detect_family, is_address_for_family, Amount, ApiKey, Asset, ChainFamily, ChainInfo,
	InvalidSlippage, ParseAmountError, Slippage,
};

pub use oracles::{
	AccountBalance, BalanceMetadata, BalanceOracle, ChainRegistry, ChainRpc, FeeOracle,
	FeeParameters, LiquidityGraph,
};

#[cfg(any(test, feature = "mocks"))]
pub use oracles::{
	MockBalanceOracle, MockChainRegistry, MockChainRpc, MockFeeOracle, MockLiquidityGraph,
};

pub use providers::{
	OrderStatus, ProviderApi, ProviderClass, ProviderError, ProviderHandler, ProviderInfo,
	ProviderResult, QuoteRequest,
};

#[cfg(any(test, feature = "mocks"))]
pub use providers::MockProviderApi;

pub use swap::{
	ApprovalMetadata, BridgeLeg, DynamicSwapAction, EvmTransaction, ExecutionResult,
	FeeComponent, FeeType, OffChainOrder, OffChainSignRequest, PathError, PermitMetadata,
	ProcessBuilder, ProcessContext, ProcessStep, SetFeeTokenMetadata, Step, StepFeeInfo,
	StepMetadata, StepType, SubmitStepParams, SubstrateCall, SwapActionKind, SwapLeg, SwapPair,
	SwapPath, SwapProcess, SwapQuote, SwapRequest, TransactionPayload, ValidateSwapParams,
};

pub use validation::ValidationPolicy;
