//! Scripted provider APIs
//!
//! Quote services with call tracking, configurable delay and failure, and an
//! order book that fills relayed orders after a few polls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use xswap::chrono::Utc;
use xswap::serde_json::{json, Value};
use xswap::{
	Amount, ProviderApi, ProviderError, StepFeeInfo, SwapQuote,
};
use xswap::types::{OffChainOrder, OrderStatus, ProviderResult, QuoteRequest};

pub const ROUTER: &str = "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45";
pub const SETTLEMENT: &str = "0x9008D19f58AAbD9eD0D60971565AA8510560ab41";

/// How the API answers quote requests
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
	None,
	/// Provider refuses amounts at or below this floor
	AmountTooLow(u64),
	Unsupported,
	Transport,
}

/// Mock quote API that combines testing features
///
/// - Call tracking for fan-out and blocking assertions
/// - Configurable response delay for timeout testing
/// - Failure simulation
/// - Provider-specific metadata so handlers can build their steps
#[derive(Debug, Clone)]
pub struct MockQuoteApi {
	pub provider_id: String,
	pub to_amount: u64,
	pub response_delay_ms: u64,
	pub failure: Failure,
	/// Expiry relative to the answer; `None` leaves it to the broker
	pub alive_for_ms: Option<i64>,
	pub min_swap: Option<u64>,
	pub metadata: Value,
	/// Polls answered `Pending` before an order fills
	pub pending_polls: usize,
	call_tracker: Arc<AtomicUsize>,
	poll_tracker: Arc<AtomicUsize>,
	relayed: Arc<Mutex<Vec<OffChainOrder>>>,
}

impl MockQuoteApi {
	pub fn new(provider_id: &str, to_amount: u64) -> Self {
		Self {
			provider_id: provider_id.to_string(),
			to_amount,
			response_delay_ms: 0,
			failure: Failure::None,
			alive_for_ms: None,
			min_swap: None,
			metadata: Value::Null,
			pending_polls: 0,
			call_tracker: Arc::new(AtomicUsize::new(0)),
			poll_tracker: Arc::new(AtomicUsize::new(0)),
			relayed: Arc::new(Mutex::new(Vec::new())),
		}
	}

	/// AMM quote carrying a router call
	pub fn amm(provider_id: &str, to_amount: u64) -> Self {
		Self::new(provider_id, to_amount).with_metadata(json!({
			"spender": ROUTER,
			"tx": { "to": ROUTER, "data": "0x5ae401dc", "gasLimit": 180000 }
		}))
	}

	/// RFQ quote carrying typed data and an order body
	pub fn rfq(provider_id: &str, to_amount: u64) -> Self {
		Self::new(provider_id, to_amount).with_metadata(json!({
			"spender": SETTLEMENT,
			"typedData": { "primaryType": "Order", "message": { "buyAmount": to_amount.to_string() } },
			"order": { "kind": "sell" }
		}))
	}

	/// Hub quote with an omnipool route
	pub fn hub(provider_id: &str, to_amount: u64) -> Self {
		Self::new(provider_id, to_amount).with_metadata(json!({
			"route": [{ "pool": "omnipool" }],
			"feeTokenRate": "0.5"
		}))
	}

	pub fn with_metadata(mut self, metadata: Value) -> Self {
		self.metadata = metadata;
		self
	}

	pub fn with_delay(mut self, response_delay_ms: u64) -> Self {
		self.response_delay_ms = response_delay_ms;
		self
	}

	pub fn failing(mut self, failure: Failure) -> Self {
		self.failure = failure;
		self
	}

	pub fn alive_for_ms(mut self, ms: i64) -> Self {
		self.alive_for_ms = Some(ms);
		self
	}

	pub fn with_min_swap(mut self, min_swap: u64) -> Self {
		self.min_swap = Some(min_swap);
		self
	}

	pub fn filling_after(mut self, pending_polls: usize) -> Self {
		self.pending_polls = pending_polls;
		self
	}

	/// Get the number of quote requests received
	pub fn call_count(&self) -> usize {
		self.call_tracker.load(Ordering::Relaxed)
	}

	pub fn poll_count(&self) -> usize {
		self.poll_tracker.load(Ordering::Relaxed)
	}

	pub fn relayed_orders(&self) -> Vec<OffChainOrder> {
		self.relayed
			.lock()
			.map(|orders| orders.clone())
			.unwrap_or_default()
	}

	pub fn shared(self) -> Arc<dyn ProviderApi> {
		Arc::new(self)
	}
}

#[async_trait]
impl ProviderApi for MockQuoteApi {
	async fn quote(&self, request: &QuoteRequest) -> ProviderResult<SwapQuote> {
		self.call_tracker.fetch_add(1, Ordering::Relaxed);

		if self.response_delay_ms > 0 {
			tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
		}

		match &self.failure {
			Failure::None => {},
			Failure::AmountTooLow(min_swap) => {
				if request.from_amount <= Amount::from(*min_swap) {
					return Err(ProviderError::AmountTooLow {
						provider_id: self.provider_id.clone(),
						min_swap: Amount::from(*min_swap),
					});
				}
			},
			Failure::Unsupported => {
				return Err(ProviderError::AssetNotSupported {
					provider_id: self.provider_id.clone(),
					pair: request.pair.to_string(),
				});
			},
			Failure::Transport => {
				return Err(ProviderError::HttpStatusError {
					status_code: 503,
					reason: "Service Unavailable".to_string(),
				});
			},
		}

		let mut quote = SwapQuote::new(
			self.provider_id.clone(),
			request.pair.clone(),
			request.from_amount.clone(),
			Amount::from(self.to_amount),
			StepFeeInfo::zero("ethereum-NATIVE-ETH"),
		)
		.with_metadata(self.metadata.clone());
		if let Some(ms) = self.alive_for_ms {
			quote = quote.with_alive_until(Utc::now() + xswap::chrono::Duration::milliseconds(ms));
		}
		quote.min_swap = self.min_swap.map(Amount::from);
		Ok(quote)
	}

	async fn submit_order(&self, order: &OffChainOrder) -> ProviderResult<String> {
		if let Ok(mut relayed) = self.relayed.lock() {
			relayed.push(order.clone());
		}
		Ok(format!("{}-order-{}", self.provider_id, order.quote_id))
	}

	async fn order_status(&self, _order_id: &str) -> ProviderResult<OrderStatus> {
		let polls = self.poll_tracker.fetch_add(1, Ordering::Relaxed);
		if polls < self.pending_polls {
			Ok(OrderStatus::Pending)
		} else {
			Ok(OrderStatus::Filled {
				tx_hash: Some("0xfilled".to_string()),
			})
		}
	}
}
