//! Quote brokering
//!
//! Fans a quote request out to every provider able to serve the route, each
//! in its own task with its own timeout, then ranks what comes back.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use xswap_providers::ProviderRegistry;
use xswap_types::{
	ChainRegistry, ProviderClass, ProviderError, QuoteRequest, SwapError, SwapErrorKind,
	SwapQuote,
};

/// Broker settings
#[derive(Debug, Clone)]
pub struct QuoteBrokerConfig {
	/// Tie-break order between quotes with the same output
	pub priority: Vec<String>,
	/// Expiry applied to AMM-style quotes sent without one
	pub default_ttl: Duration,
	/// Expiry applied to order-book quotes sent without one
	pub order_book_ttl: Duration,
	pub default_timeout: Duration,
	pub provider_timeouts: HashMap<String, Duration>,
	/// Providers excluded from fan-out
	pub blocked_providers: HashSet<String>,
}

impl Default for QuoteBrokerConfig {
	fn default() -> Self {
		Self {
			priority: Vec::new(),
			default_ttl: Duration::from_secs(60),
			order_book_ttl: Duration::from_secs(15),
			default_timeout: Duration::from_secs(5),
			provider_timeouts: HashMap::new(),
			blocked_providers: HashSet::new(),
		}
	}
}

impl QuoteBrokerConfig {
	pub fn ttl_for(&self, class: ProviderClass) -> Duration {
		if class.is_order_book() {
			self.order_book_ttl
		} else {
			self.default_ttl
		}
	}

	pub fn timeout_for(&self, provider_id: &str) -> Duration {
		self.provider_timeouts
			.get(provider_id)
			.copied()
			.unwrap_or(self.default_timeout)
	}

	fn priority_of(&self, provider_id: &str) -> usize {
		self.priority
			.iter()
			.position(|p| p == provider_id)
			.unwrap_or(usize::MAX)
	}
}

/// Failure of one provider during fan-out
#[derive(Debug, Clone)]
pub struct ProviderFailure {
	pub provider_id: String,
	pub error: SwapError,
}

/// Ranked quotes, best first, and the preferred failure when none came back
#[derive(Debug, Clone, Default)]
pub struct QuoteOutcome {
	pub quotes: Vec<SwapQuote>,
	pub failures: Vec<ProviderFailure>,
	pub error: Option<SwapError>,
}

impl QuoteOutcome {
	/// The explicitly preferred provider's live quote if present, else the best one
	pub fn select(&self, preferred_provider: Option<&str>) -> Option<&SwapQuote> {
		preferred_provider
			.and_then(|preferred| {
				self.quotes
					.iter()
					.find(|q| q.provider == preferred && !q.is_expired())
			})
			.or_else(|| self.quotes.first())
	}
}

/// Trait for collecting quotes from providers
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait QuoteBrokerTrait: Send + Sync {
	async fn ask_quotes(&self, request: &QuoteRequest) -> QuoteOutcome;
}

pub struct QuoteBroker {
	providers: Arc<ProviderRegistry>,
	registry: Arc<dyn ChainRegistry>,
	config: QuoteBrokerConfig,
}

impl QuoteBroker {
	pub fn new(
		providers: Arc<ProviderRegistry>,
		registry: Arc<dyn ChainRegistry>,
		config: QuoteBrokerConfig,
	) -> Self {
		Self {
			providers,
			registry,
			config,
		}
	}

	pub fn config(&self) -> &QuoteBrokerConfig {
		&self.config
	}

	fn route_chains(&self, request: &QuoteRequest) -> Result<(String, String), SwapError> {
		let from = self.registry.get_asset(&request.pair.from)?;
		let to = self.registry.get_asset(&request.pair.to)?;
		Ok((from.origin_chain, to.origin_chain))
	}

	/// Best-first order: output, then priority list, then provider id
	fn rank(&self, quotes: &mut [SwapQuote]) {
		quotes.sort_by(|a, b| {
			b.to_amount
				.cmp(&a.to_amount)
				.then_with(|| {
					self.config
						.priority_of(&a.provider)
						.cmp(&self.config.priority_of(&b.provider))
				})
				.then_with(|| a.provider.cmp(&b.provider))
		});
	}
}

/// Specific failures first, then "asset not supported", then transport/internal
fn failure_rank(kind: SwapErrorKind) -> u8 {
	match kind {
		SwapErrorKind::AssetNotSupported => 1,
		SwapErrorKind::InternalError => 2,
		_ => 0,
	}
}

/// Most informative error among the provider failures
pub fn preferred_failure(failures: &[ProviderFailure]) -> SwapError {
	failures
		.iter()
		.min_by_key(|f| failure_rank(f.error.kind))
		.map(|f| f.error.clone())
		.unwrap_or_else(|| SwapError::new(SwapErrorKind::AssetNotSupported))
}

#[async_trait]
impl QuoteBrokerTrait for QuoteBroker {
	async fn ask_quotes(&self, request: &QuoteRequest) -> QuoteOutcome {
		let (from_chain, to_chain) = match self.route_chains(request) {
			Ok(chains) => chains,
			Err(e) => {
				warn!("Cannot resolve chains for {}: {}", request.pair, e);
				return QuoteOutcome {
					error: Some(SwapError::new(SwapErrorKind::AssetNotSupported)),
					..Default::default()
				};
			},
		};

		let eligible: Vec<_> = self
			.providers
			.supporting_route(&from_chain, &to_chain)
			.into_iter()
			.filter(|h| !self.config.blocked_providers.contains(h.id()))
			.collect();
		if eligible.is_empty() {
			info!("No provider serves {} -> {}", from_chain, to_chain);
			return QuoteOutcome {
				error: Some(SwapError::new(SwapErrorKind::AssetNotSupported)),
				..Default::default()
			};
		}

		info!(
			"Fetching quotes for {} from {} providers",
			request.pair,
			eligible.len()
		);

		let tasks = eligible.iter().map(|handler| {
			let handler = Arc::clone(handler);
			let request = request.clone();
			let provider_timeout = self.config.timeout_for(handler.id());
			let ttl = self.config.ttl_for(handler.class());

			tokio::spawn(async move {
				let provider_id = handler.id().to_string();
				debug!("Starting quote fetch from provider {}", provider_id);

				let result = match timeout(provider_timeout, handler.fetch_quote(&request)).await {
					Ok(result) => result,
					Err(_) => Err(ProviderError::timeout(provider_timeout)),
				};
				result.map(|mut quote| {
					quote.provider = provider_id;
					if let Ok(ttl) = chrono::Duration::from_std(ttl) {
						quote.ensure_alive_until(ttl, Utc::now());
					}
					quote
				})
			})
		});
		let ids: Vec<String> = eligible.iter().map(|h| h.id().to_string()).collect();
		let results = join_all(tasks).await;

		let mut outcome = QuoteOutcome::default();
		for (provider_id, joined) in ids.into_iter().zip(results) {
			match joined {
				Ok(Ok(quote)) if quote.is_expired() => {
					warn!("Provider {} returned an expired quote", provider_id);
					outcome.failures.push(ProviderFailure {
						provider_id,
						error: SwapError::new(SwapErrorKind::QuoteTimeout),
					});
				},
				Ok(Ok(quote)) => {
					debug!(
						"Provider {} quoted {} for {}",
						provider_id, quote.to_amount, quote.from_amount
					);
					outcome.quotes.push(quote);
				},
				Ok(Err(e)) => {
					warn!("Provider {} returned error: {}", provider_id, e);
					outcome.failures.push(ProviderFailure {
						provider_id,
						error: SwapError::from(e),
					});
				},
				Err(e) => {
					warn!("Quote task for provider {} failed: {}", provider_id, e);
					outcome.failures.push(ProviderFailure {
						provider_id,
						error: SwapError::internal(format!("Quote task failed: {e}")),
					});
				},
			}
		}

		self.rank(&mut outcome.quotes);
		if outcome.quotes.is_empty() {
			outcome.error = Some(preferred_failure(&outcome.failures));
		}

		info!(
			"Quote brokering completed: {} quotes, {} failures",
			outcome.quotes.len(),
			outcome.failures.len()
		);
		outcome
	}
}
