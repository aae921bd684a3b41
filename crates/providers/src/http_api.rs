//! HTTP implementation of a provider's remote quote API
//!
//! Endpoints, relative to the provider's base URL:
//! - `POST /quote` with a [`QuoteRequest`] body
//! - `POST /orders` with a signed [`OffChainOrder`] (RFQ providers)
//! - `GET /orders/{id}` returning an [`OrderStatus`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;
use xswap_types::{
	Amount, FeeComponent, OffChainOrder, OrderStatus, ProviderApi, ProviderError, ProviderResult,
	QuoteRequest, StepFeeInfo, SwapQuote,
};

use crate::client_cache::{AuthConfig, ClientCache, ClientConfig};

/// Connection settings of one provider API
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
	pub provider_id: String,
	pub endpoint: String,
	pub timeout_ms: u64,
	pub headers: HashMap<String, String>,
	pub auth: AuthConfig,
}

/// Quote as returned on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQuote {
	#[serde(default)]
	pub id: Option<String>,
	pub from_amount: Amount,
	pub to_amount: Amount,
	#[serde(default)]
	pub rate: Decimal,
	#[serde(default)]
	pub fees: Vec<FeeComponent>,
	pub fee_token: String,
	/// Unix seconds
	#[serde(default)]
	pub alive_until: Option<i64>,
	#[serde(default)]
	pub min_swap: Option<Amount>,
	#[serde(default)]
	pub estimated_arrival_secs: Option<u64>,
	#[serde(default)]
	pub metadata: serde_json::Value,
}

/// Typed rejection from the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireError {
	pub code: String,
	pub message: String,
	#[serde(default)]
	pub min_swap: Option<Amount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum QuoteResponseBody {
	Error { error: WireError },
	Quote(WireQuote),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitOrderResponse {
	order_id: String,
}

/// Providers echo a quote id when they have one, otherwise a fresh one is used
fn parse_quote_id(id: Option<&str>) -> Uuid {
	id.and_then(|s| Uuid::parse_str(s).ok())
		.unwrap_or_else(Uuid::new_v4)
}

impl WireQuote {
	fn into_quote(self, provider_id: &str, request: &QuoteRequest) -> SwapQuote {
		let mut fee_info = StepFeeInfo::zero(self.fee_token);
		fee_info.fee_components = self.fees;

		SwapQuote {
			id: parse_quote_id(self.id.as_deref()),
			provider: provider_id.to_string(),
			pair: request.pair.clone(),
			from_amount: self.from_amount,
			to_amount: self.to_amount,
			rate: self.rate,
			fee_info,
			alive_until: self
				.alive_until
				.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
			min_swap: self.min_swap,
			estimated_arrival_secs: self.estimated_arrival_secs,
			metadata: self.metadata,
		}
	}
}

impl WireError {
	fn into_error(self, provider_id: &str, request: &QuoteRequest) -> ProviderError {
		match (self.code.to_ascii_uppercase().as_str(), self.min_swap) {
			(_, Some(min_swap)) => ProviderError::AmountTooLow {
				provider_id: provider_id.to_string(),
				min_swap,
			},
			("ASSET_NOT_SUPPORTED" | "PAIR_NOT_SUPPORTED", None) => {
				ProviderError::AssetNotSupported {
					provider_id: provider_id.to_string(),
					pair: request.pair.to_string(),
				}
			},
			_ => ProviderError::Rejected {
				provider_id: provider_id.to_string(),
				code: self.code,
				message: self.message,
			},
		}
	}
}

/// Provider API reached over HTTP with a pooled client
#[derive(Debug, Clone)]
pub struct HttpProviderApi {
	config: HttpApiConfig,
	client: Arc<Client>,
}

impl HttpProviderApi {
	pub fn new(config: HttpApiConfig, cache: &ClientCache) -> ProviderResult<Self> {
		let client_config = ClientConfig::new(&config.provider_id, &config.endpoint, &config.headers);
		let client = cache.get_client_with_auth(&client_config, &config.auth)?;
		Ok(Self { config, client })
	}

	pub fn provider_id(&self) -> &str {
		&self.config.provider_id
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
	}

	fn timeout(&self) -> Duration {
		Duration::from_millis(self.config.timeout_ms)
	}

	fn map_send_error(&self, err: reqwest::Error) -> ProviderError {
		if err.is_timeout() {
			ProviderError::Timeout {
				timeout_ms: self.config.timeout_ms,
			}
		} else {
			ProviderError::HttpError(err)
		}
	}

	fn unsupported(&self, operation: &str) -> ProviderError {
		ProviderError::UnsupportedOperation {
			operation: operation.to_string(),
			provider_id: self.config.provider_id.clone(),
		}
	}
}

#[async_trait]
impl ProviderApi for HttpProviderApi {
	async fn quote(&self, request: &QuoteRequest) -> ProviderResult<SwapQuote> {
		let url = self.url("quote");
		debug!(
			"Fetching quote from {} ({}): {} {}",
			url, self.config.provider_id, request.from_amount, request.pair
		);

		let response = self
			.client
			.post(&url)
			.timeout(self.timeout())
			.json(request)
			.send()
			.await
			.map_err(|e| self.map_send_error(e))?;

		let status = response.status();
		let text = response.text().await.map_err(|e| self.map_send_error(e))?;
		let parsed = serde_json::from_str::<QuoteResponseBody>(&text);

		match parsed {
			Ok(QuoteResponseBody::Error { error }) => {
				warn!(
					"Provider {} rejected quote: {} - {}",
					self.config.provider_id, error.code, error.message
				);
				Err(error.into_error(&self.config.provider_id, request))
			},
			_ if !status.is_success() => Err(ProviderError::from_http_failure(status.as_u16())),
			Ok(QuoteResponseBody::Quote(quote)) => {
				Ok(quote.into_quote(&self.config.provider_id, request))
			},
			Err(e) => Err(ProviderError::InvalidResponse {
				reason: format!("Failed to parse quote response: {}", e),
			}),
		}
	}

	async fn submit_order(&self, order: &OffChainOrder) -> ProviderResult<String> {
		if order.provider != self.config.provider_id {
			return Err(self.unsupported("submit_order"));
		}
		let response = self
			.client
			.post(self.url("orders"))
			.timeout(self.timeout())
			.json(order)
			.send()
			.await
			.map_err(|e| self.map_send_error(e))?;

		if !response.status().is_success() {
			return Err(ProviderError::from_http_failure(response.status().as_u16()));
		}
		let body: SubmitOrderResponse =
			response
				.json()
				.await
				.map_err(|e| ProviderError::InvalidResponse {
					reason: format!("Failed to parse order submission response: {}", e),
				})?;
		Ok(body.order_id)
	}

	async fn order_status(&self, order_id: &str) -> ProviderResult<OrderStatus> {
		let response = self
			.client
			.get(self.url(&format!("orders/{}", order_id)))
			.timeout(self.timeout())
			.send()
			.await
			.map_err(|e| self.map_send_error(e))?;

		if !response.status().is_success() {
			return Err(ProviderError::from_http_failure(response.status().as_u16()));
		}
		response
			.json()
			.await
			.map_err(|e| ProviderError::InvalidResponse {
				reason: format!("Failed to parse order status: {}", e),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use mockito::Server;
	use xswap_types::{Slippage, SwapErrorKind, SwapPair};

	fn request() -> QuoteRequest {
		QuoteRequest {
			pair: SwapPair::new("ethereum-ERC20-USDC", "ethereum-NATIVE-ETH"),
			from_amount: Amount::from(1_000_000u64),
			address: "0x742d35Cc6634C0532925a3b8D38BA2297C33A9D7".to_string(),
			recipient: None,
			slippage: Slippage::zero(),
			is_cross_chain: false,
		}
	}

	fn api(endpoint: &str) -> HttpProviderApi {
		HttpProviderApi::new(
			HttpApiConfig {
				provider_id: "uniswap".to_string(),
				endpoint: endpoint.to_string(),
				timeout_ms: 2_000,
				headers: HashMap::new(),
				auth: AuthConfig::None,
			},
			&ClientCache::new(),
		)
		.unwrap()
	}

	#[tokio::test]
	async fn test_quote_is_decoded() {
		let mut server = Server::new_async().await;
		let mock = server
			.mock("POST", "/quote")
			.expect(1)
			.with_body(
				r#"{
					"fromAmount": "1000000",
					"toAmount": "420000000000000",
					"rate": "0.00042",
					"fees": [{"feeType": "PROTOCOL", "amount": "3000", "tokenSlug": "ethereum-ERC20-USDC"}],
					"feeToken": "ethereum-NATIVE-ETH",
					"aliveUntil": 4102444800,
					"metadata": {"spender": "0xspender"}
				}"#,
			)
			.create_async()
			.await;

		let quote = api(&server.url()).quote(&request()).await.unwrap();
		mock.assert_async().await;

		assert_eq!(quote.provider, "uniswap");
		assert_eq!(quote.to_amount, Amount::from(420_000_000_000_000u64));
		assert_eq!(quote.fee_info.fee_token(), "ethereum-NATIVE-ETH");
		assert_eq!(quote.fee_info.fee_components.len(), 1);
		assert!(quote.alive_until.is_some());
		assert_eq!(quote.metadata["spender"], "0xspender");
	}

	#[tokio::test]
	async fn test_typed_rejection_is_translated() {
		let mut server = Server::new_async().await;
		let _mock = server
			.mock("POST", "/quote")
			.with_status(400)
			.with_body(r#"{"error": {"code": "amount_too_low", "message": "too small", "minSwap": "5000000"}}"#)
			.create_async()
			.await;

		let err = api(&server.url()).quote(&request()).await.unwrap_err();
		assert!(matches!(err, ProviderError::AmountTooLow { .. }));
		assert_eq!(err.kind(), SwapErrorKind::NotMeetMinSwap);
	}

	#[tokio::test]
	async fn test_http_failure_without_body() {
		let mut server = Server::new_async().await;
		let _mock = server
			.mock("POST", "/quote")
			.with_status(503)
			.create_async()
			.await;

		let err = api(&server.url()).quote(&request()).await.unwrap_err();
		assert_eq!(err.status_code(), Some(503));
	}

	#[tokio::test]
	async fn test_order_status() {
		let mut server = Server::new_async().await;
		let _mock = server
			.mock("GET", "/orders/abc")
			.with_body(r#"{"status": "filled", "tx_hash": "0xfeed"}"#)
			.create_async()
			.await;

		let status = api(&server.url()).order_status("abc").await.unwrap();
		assert_eq!(
			status,
			OrderStatus::Filled {
				tx_hash: Some("0xfeed".to_string())
			}
		);
	}
}
