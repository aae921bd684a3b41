//! User-visible swap error taxonomy
//!
//! Every failure that reaches a caller of the orchestrator is a [`SwapError`]:
//! a closed [`SwapErrorKind`] plus a default English message. Rendering and
//! localisation belong to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of swap failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapErrorKind {
	NoPath,
	AssetNotSupported,
	QuoteTimeout,
	NotMeetMinSwap,
	NotEnoughBalance,
	NotEnoughExistentialDeposit,
	ReceiverNotEnoughExistentialDeposit,
	InvalidRecipient,
	InvalidParams,
	Unsupported,
	InternalError,
	FeatureBlocked,
}

impl SwapErrorKind {
	pub fn default_message(&self) -> &'static str {
		match self {
			SwapErrorKind::NoPath => "No swap path found for the selected pair",
			SwapErrorKind::AssetNotSupported => "This pair is not supported by any provider",
			SwapErrorKind::QuoteTimeout => "The quote has expired, please request a new one",
			SwapErrorKind::NotMeetMinSwap => "Amount is below the minimum swap amount",
			SwapErrorKind::NotEnoughBalance => "Insufficient balance to cover amount and fees",
			SwapErrorKind::NotEnoughExistentialDeposit => {
				"Amount received would not keep the destination account alive"
			},
			SwapErrorKind::ReceiverNotEnoughExistentialDeposit => {
				"Recipient account is not active on the destination chain, funds may be lost"
			},
			SwapErrorKind::InvalidRecipient => {
				"Recipient address does not match the destination chain"
			},
			SwapErrorKind::InvalidParams => "Invalid swap parameters",
			SwapErrorKind::Unsupported => "This swap route is not supported",
			SwapErrorKind::InternalError => "Internal error while preparing the swap",
			SwapErrorKind::FeatureBlocked => "Swap is temporarily unavailable",
		}
	}

	/// Failures that put the destination account itself at risk
	pub fn is_liveness_risk(&self) -> bool {
		matches!(
			self,
			SwapErrorKind::NotEnoughExistentialDeposit
				| SwapErrorKind::ReceiverNotEnoughExistentialDeposit
		)
	}
}

impl fmt::Display for SwapErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = serde_json::to_value(self)
			.ok()
			.and_then(|v| v.as_str().map(str::to_string))
			.unwrap_or_default();
		f.write_str(&name)
	}
}

/// Error surfaced to callers of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SwapError {
	pub kind: SwapErrorKind,
	pub message: String,
}

impl SwapError {
	pub fn new(kind: SwapErrorKind) -> Self {
		Self {
			kind,
			message: kind.default_message().to_string(),
		}
	}

	pub fn with_message(kind: SwapErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	pub fn internal(message: impl Into<String>) -> Self {
		Self::with_message(SwapErrorKind::InternalError, message)
	}

	pub fn invalid_params(message: impl Into<String>) -> Self {
		Self::with_message(SwapErrorKind::InvalidParams, message)
	}
}

impl From<SwapErrorKind> for SwapError {
	fn from(kind: SwapErrorKind) -> Self {
		SwapError::new(kind)
	}
}

/// Failures of external collaborators (balances, registry, fees, RPC, graph)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
	#[error("Asset not found in registry: {slug}")]
	AssetNotFound { slug: String },

	#[error("Chain not found in registry: {slug}")]
	ChainNotFound { slug: String },

	#[error("Balance unavailable for {asset} on {chain}: {reason}")]
	BalanceUnavailable {
		chain: String,
		asset: String,
		reason: String,
	},

	#[error("Fee parameters unavailable for {chain}: {reason}")]
	FeeUnavailable { chain: String, reason: String },

	#[error("RPC call failed on {chain}: {reason}")]
	Rpc { chain: String, reason: String },

	#[error("Liquidity graph unavailable: {0}")]
	Graph(String),
}

impl From<OracleError> for SwapError {
	fn from(err: OracleError) -> Self {
		let kind = match &err {
			OracleError::AssetNotFound { .. } | OracleError::ChainNotFound { .. } => {
				SwapErrorKind::AssetNotSupported
			},
			_ => SwapErrorKind::InternalError,
		};
		SwapError::with_message(kind, err.to_string())
	}
}

pub type SwapResult<T> = Result<T, SwapError>;
pub type OracleResult<T> = Result<T, OracleError>;
