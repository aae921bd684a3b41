//! xswap
//!
//! Multi-chain swap orchestration core: resolve a pair into an action path,
//! broker quotes across providers, expand the best quote into an ordered step
//! pipeline, validate it against live balances and execute it step by step.
//!
//! [`SwapOrchestratorBuilder`] wires everything from [`Settings`] and the
//! chain collaborators supplied by the host.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

// Core domain types
pub use xswap_types::{
	chrono, serde_json, AccountBalance, Amount, Asset, BalanceOracle, BridgeLeg, ChainFamily,
	ChainInfo, ChainRegistry, ChainRpc, DynamicSwapAction, EvmTransaction, ExecutionResult,
	FeeOracle, FeeParameters, LiquidityGraph, OffChainOrder, OracleError, OrderStatus,
	ProcessContext, ProcessStep, ProviderApi, ProviderClass, ProviderError, ProviderHandler,
	ProviderInfo, QuoteRequest, Slippage, StepFeeInfo, StepMetadata, StepType, SubmitStepParams,
	SwapError, SwapErrorKind, SwapLeg, SwapPair, SwapPath, SwapProcess, SwapQuote, SwapRequest,
	SwapResult, TransactionPayload, ValidateSwapParams, ValidationPolicy,
};

// Service layer
pub use xswap_service::{
	FeatureFlags, PairCatalog, PathResolver, QuoteBroker, QuoteBrokerConfig, QuoteOutcome,
	SwapOrchestrator, SwapPlan,
};

// Providers
pub use xswap_providers::{
	AuthConfig, ChainServices, ClientCache, HandlerFactory, HttpApiConfig, ProviderRegistry,
	RfqOptions,
};

// Config
pub use xswap_config::{
	load_config, log_service_info, ConfigLoadError, ConfigValidationError, ConfigurableValueError,
	LogFormat, LoggingSettings, ProviderSettings, Settings,
};

pub mod types {
	pub use xswap_types::*;
}

pub mod providers {
	pub use xswap_providers::*;
}

pub mod service {
	pub use xswap_service::*;
}

pub mod config {
	pub use xswap_config::*;
}

/// Chain-facing services the host plugs into the core
#[derive(Clone)]
pub struct Collaborators {
	pub registry: Arc<dyn ChainRegistry>,
	pub balances: Arc<dyn BalanceOracle>,
	pub fees: Arc<dyn FeeOracle>,
	pub rpc: Arc<dyn ChainRpc>,
	pub graph: Arc<dyn LiquidityGraph>,
}

#[derive(Debug, Error)]
pub enum BuildError {
	#[error(transparent)]
	Load(#[from] ConfigLoadError),

	#[error(transparent)]
	Invalid(#[from] ConfigValidationError),

	#[error("API key of provider {provider_id}: {source}")]
	Secret {
		provider_id: String,
		source: ConfigurableValueError,
	},

	#[error("Provider {provider_id} could not be created: {source}")]
	Provider {
		provider_id: String,
		source: ProviderError,
	},

	#[error("Tracing initialisation failed: {0}")]
	Tracing(String),
}

/// Initialize tracing from logging settings; `RUST_LOG` overrides the level
pub fn init_tracing(logging: &LoggingSettings) -> Result<(), BuildError> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

	let result = match logging.format {
		LogFormat::Json => tracing_subscriber::fmt()
			.json()
			.with_env_filter(env_filter)
			.with_target(true)
			.try_init(),
		LogFormat::Pretty => tracing_subscriber::fmt()
			.pretty()
			.with_env_filter(env_filter)
			.try_init(),
		LogFormat::Compact => tracing_subscriber::fmt()
			.compact()
			.with_env_filter(env_filter)
			.try_init(),
	};
	result.map_err(|e| BuildError::Tracing(e.to_string()))?;

	info!(
		"Logging configuration applied: level={}, format={:?}",
		logging.level, logging.format
	);
	Ok(())
}

/// Builder pattern for configuring the orchestrator
pub struct SwapOrchestratorBuilder {
	collaborators: Collaborators,
	settings: Option<Settings>,
	apis: HashMap<String, Arc<dyn ProviderApi>>,
	handlers: Vec<Arc<dyn ProviderHandler>>,
	client_cache: Option<ClientCache>,
}

impl SwapOrchestratorBuilder {
	pub fn new(collaborators: Collaborators) -> Self {
		Self {
			collaborators,
			settings: None,
			apis: HashMap::new(),
			handlers: Vec::new(),
			client_cache: None,
		}
	}

	/// Builder over settings read from `config/xswap` and `XSWAP__` variables
	pub fn from_config(collaborators: Collaborators) -> Result<Self, BuildError> {
		Ok(Self::new(collaborators).with_settings(load_config()?))
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Talk to a configured provider through `api` instead of HTTP
	pub fn with_provider_api(mut self, provider_id: &str, api: Arc<dyn ProviderApi>) -> Self {
		self.apis.insert(provider_id.to_string(), api);
		self
	}

	/// Register a handler that is not described in the settings
	pub fn with_handler(mut self, handler: Arc<dyn ProviderHandler>) -> Self {
		self.handlers.push(handler);
		self
	}

	pub fn with_client_cache(mut self, cache: ClientCache) -> Self {
		self.client_cache = Some(cache);
		self
	}

	fn chain_services(&self, settings: &Settings) -> ChainServices {
		ChainServices {
			registry: Arc::clone(&self.collaborators.registry),
			balances: Arc::clone(&self.collaborators.balances),
			fees: Arc::clone(&self.collaborators.fees),
			rpc: Arc::clone(&self.collaborators.rpc),
			policy: settings.validation_policy(),
		}
	}

	fn provider_registry(&self, settings: &Settings) -> Result<ProviderRegistry, BuildError> {
		let services = self.chain_services(settings);
		let rfq_options = RfqOptions {
			poll_interval: Duration::from_millis(settings.timeouts.rfq_poll_interval_ms),
			fill_timeout: Duration::from_millis(settings.timeouts.rfq_fill_timeout_ms),
		};
		let cache = self.client_cache.clone().unwrap_or_else(ClientCache::shared);

		let mut registry = ProviderRegistry::new();
		for provider in settings.enabled_providers() {
			let info = ProviderInfo::new(&provider.provider_id, provider.kind)
				.with_name(
					provider
						.name
						.clone()
						.unwrap_or_else(|| provider.provider_id.clone()),
				)
				.with_chains(provider.chains.clone());

			let handler = match self.apis.get(&provider.provider_id) {
				Some(api) => {
					HandlerFactory::create(info, Arc::clone(api), services.clone(), rfq_options)
				},
				None => {
					let config = HttpApiConfig {
						provider_id: provider.provider_id.clone(),
						endpoint: provider.endpoint.clone(),
						timeout_ms: u64::try_from(settings.provider_timeout(provider).as_millis())
							.unwrap_or(u64::MAX),
						headers: provider.headers.clone(),
						auth: provider_auth(provider)?,
					};
					HandlerFactory::create_http(info, config, &cache, services.clone(), rfq_options)
						.map_err(|source| BuildError::Provider {
							provider_id: provider.provider_id.clone(),
							source,
						})?
				},
			};
			registry.register(handler);
		}

		for handler in &self.handlers {
			if registry.get(handler.id()).is_some() {
				warn!("Custom handler replaces configured provider {}", handler.id());
			}
			registry.register(Arc::clone(handler));
		}
		Ok(registry)
	}

	/// Validate the settings and wire providers, broker, resolver and orchestrator
	pub fn build(self) -> Result<SwapOrchestrator, BuildError> {
		let settings = self.settings.clone().unwrap_or_default();
		settings.validate()?;
		xswap_config::log_settings_summary(&settings);

		let providers = Arc::new(self.provider_registry(&settings)?);
		if providers.is_empty() {
			warn!("No provider handlers registered, every quote request will fail");
		}

		let provider_timeouts = settings
			.enabled_providers()
			.into_iter()
			.map(|p| (p.provider_id.clone(), settings.provider_timeout(p)))
			.collect();
		let broker = QuoteBroker::new(
			Arc::clone(&providers),
			Arc::clone(&self.collaborators.registry),
			QuoteBrokerConfig {
				priority: settings.quotes.priority.clone(),
				default_ttl: Duration::from_secs(settings.quotes.default_ttl_secs),
				order_book_ttl: Duration::from_secs(settings.quotes.order_book_ttl_secs),
				default_timeout: Duration::from_millis(settings.timeouts.per_provider_ms),
				provider_timeouts,
				blocked_providers: settings.blocked_providers(),
			},
		);
		let resolver = PathResolver::new(Arc::clone(&self.collaborators.graph));

		let orchestrator = SwapOrchestrator::new(
			Arc::new(resolver),
			Arc::new(broker),
			Arc::clone(&providers),
			Arc::clone(&self.collaborators.registry),
			Arc::clone(&self.collaborators.balances),
		)
		.with_pairs(PairCatalog::new(settings.pairs.clone()))
		.with_features(FeatureFlags {
			maintenance: settings.features.maintenance,
			blocked_providers: settings.blocked_providers(),
		});

		xswap_config::log_startup_complete(providers.len());
		Ok(orchestrator)
	}
}

/// Bearer token unless a dedicated header is configured
fn provider_auth(provider: &ProviderSettings) -> Result<AuthConfig, BuildError> {
	let Some(auth) = &provider.auth else {
		return Ok(AuthConfig::None);
	};
	let key = auth
		.key
		.resolve_api_key()
		.map_err(|source| BuildError::Secret {
			provider_id: provider.provider_id.clone(),
			source,
		})?;
	Ok(match auth.header.as_deref() {
		None => AuthConfig::bearer(Some(key)),
		Some(header) if header.eq_ignore_ascii_case("authorization") => {
			AuthConfig::bearer(Some(key))
		},
		Some(header) => AuthConfig::api_key(header, key),
	})
}
