//! Error types for provider operations

use std::time::Duration;

use thiserror::Error;

use crate::errors::{OracleError, SwapError, SwapErrorKind};
use crate::models::Amount;
use crate::swap::StepType;

/// Infrastructure and provider-side failures
///
/// These never reach callers directly: the broker recovers them per provider
/// and everything else crosses into [`SwapError`] through `From`.
#[derive(Error, Debug)]
pub enum ProviderError {
	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Provider {provider_id} rejected the request: {code} - {message}")]
	Rejected {
		provider_id: String,
		code: String,
		message: String,
	},

	#[error("Amount is below the minimum of {min_swap} for provider {provider_id}")]
	AmountTooLow { provider_id: String, min_swap: Amount },

	#[error("Pair {pair} is not supported by provider {provider_id}")]
	AssetNotSupported { provider_id: String, pair: String },

	#[error("Unsupported operation: {operation} for provider {provider_id}")]
	UnsupportedOperation {
		operation: String,
		provider_id: String,
	},

	#[error("No signature recorded for {step_type} step")]
	MissingSignature { step_type: StepType },

	#[error("Order {order_id} failed: {reason}")]
	OrderFailed { order_id: String, reason: String },

	#[error("Collaborator error: {0}")]
	Oracle(#[from] OracleError),

	#[error(transparent)]
	Swap(#[from] SwapError),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl ProviderError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			ProviderError::HttpStatusError { status_code, .. } => Some(*status_code),
			ProviderError::HttpError(err) => err.status().map(|status| status.as_u16()),
			_ => None,
		}
	}

	/// Timeout after `elapsed`, saturating at `u64::MAX` milliseconds
	pub fn timeout(elapsed: Duration) -> Self {
		Self::Timeout {
			timeout_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
		}
	}

	pub fn http_failure(status_code: u16, reason: impl Into<String>) -> Self {
		Self::HttpStatusError {
			status_code,
			reason: reason.into(),
		}
	}

	/// HTTP failure with the standard reason phrase for `status_code`
	pub fn from_http_failure(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			408 => "Request Timeout".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			504 => "Gateway Timeout".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};
		Self::http_failure(status_code, reason)
	}

	/// Taxonomy class of this failure
	pub fn kind(&self) -> SwapErrorKind {
		match self {
			ProviderError::Rejected { code, .. } => {
				serde_json::from_value(serde_json::Value::String(code.to_ascii_uppercase()))
					.unwrap_or(SwapErrorKind::InternalError)
			},
			ProviderError::AmountTooLow { .. } => SwapErrorKind::NotMeetMinSwap,
			ProviderError::AssetNotSupported { .. } => SwapErrorKind::AssetNotSupported,
			ProviderError::UnsupportedOperation { .. } => SwapErrorKind::Unsupported,
			ProviderError::MissingSignature { .. } => SwapErrorKind::InvalidParams,
			ProviderError::Oracle(err) => SwapError::from(err.clone()).kind,
			ProviderError::Swap(err) => err.kind,
			ProviderError::HttpError(_)
			| ProviderError::HttpStatusError { .. }
			| ProviderError::Timeout { .. }
			| ProviderError::InvalidResponse { .. }
			| ProviderError::OrderFailed { .. }
			| ProviderError::Serialization(_) => SwapErrorKind::InternalError,
		}
	}

	/// Transport and decoding failures, as opposed to answers from the provider
	pub fn is_transport(&self) -> bool {
		matches!(
			self,
			ProviderError::HttpError(_)
				| ProviderError::HttpStatusError { .. }
				| ProviderError::Timeout { .. }
				| ProviderError::InvalidResponse { .. }
				| ProviderError::Serialization(_)
		)
	}
}

impl From<ProviderError> for SwapError {
	fn from(err: ProviderError) -> Self {
		match err {
			ProviderError::Swap(inner) => inner,
			other => SwapError::with_message(other.kind(), other.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_provider_error_status_code_extraction() {
		let error = ProviderError::from_http_failure(429);
		assert_eq!(error.status_code(), Some(429));
		assert!(error.to_string().contains("Too Many Requests"));

		let error = ProviderError::InvalidResponse {
			reason: "Bad response".to_string(),
		};
		assert_eq!(error.status_code(), None);
	}

	#[test]
	fn test_kind_mapping() {
		let rejected = ProviderError::Rejected {
			provider_id: "chainflip".into(),
			code: "not_meet_min_swap".into(),
			message: "too small".into(),
		};
		assert_eq!(rejected.kind(), SwapErrorKind::NotMeetMinSwap);

		let unknown = ProviderError::Rejected {
			provider_id: "chainflip".into(),
			code: "E1234".into(),
			message: "?".into(),
		};
		assert_eq!(unknown.kind(), SwapErrorKind::InternalError);

		assert_eq!(
			ProviderError::Timeout { timeout_ms: 100 }.kind(),
			SwapErrorKind::InternalError
		);
		assert!(ProviderError::Timeout { timeout_ms: 100 }.is_transport());
	}

	#[test]
	fn test_timeout_saturates_in_milliseconds() {
		match ProviderError::timeout(Duration::from_millis(2_500)) {
			ProviderError::Timeout { timeout_ms } => assert_eq!(timeout_ms, 2_500),
			other => panic!("expected a timeout, got {other:?}"),
		}
		match ProviderError::timeout(Duration::MAX) {
			ProviderError::Timeout { timeout_ms } => assert_eq!(timeout_ms, u64::MAX),
			other => panic!("expected a timeout, got {other:?}"),
		}
	}

	#[test]
	fn test_swap_error_passes_through_unchanged() {
		let inner = SwapError::new(SwapErrorKind::NoPath);
		let err: SwapError = ProviderError::Swap(inner.clone()).into();
		assert_eq!(err, inner);
	}
}
