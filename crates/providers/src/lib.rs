//! xswap providers
//!
//! Provider handlers, their HTTP quote APIs and the registry the orchestrator
//! resolves handlers from.

pub mod client_cache;
pub mod common;
pub mod handlers;
pub mod http_api;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub use client_cache::{AuthConfig, ClientCache, ClientConfig};
pub use common::ChainServices;
pub use handlers::{AmmHandler, CrossChainAmmHandler, HubHandler, RfqHandler, RfqOptions};
pub use http_api::{HttpApiConfig, HttpProviderApi};
pub use xswap_types::{ProviderError, ProviderHandler, ProviderResult};

use xswap_types::{ProviderApi, ProviderClass, ProviderInfo};

/// Factory for provider handlers
pub struct HandlerFactory;

impl HandlerFactory {
	/// Handler for the provider's class, talking to `api`
	pub fn create(
		info: ProviderInfo,
		api: Arc<dyn ProviderApi>,
		services: ChainServices,
		rfq_options: RfqOptions,
	) -> Arc<dyn ProviderHandler> {
		match info.class {
			ProviderClass::Amm => Arc::new(AmmHandler::new(info, api, services)),
			ProviderClass::Rfq => Arc::new(RfqHandler::new(info, api, services, rfq_options)),
			ProviderClass::CrossChainAmm => {
				Arc::new(CrossChainAmmHandler::new(info, api, services))
			},
			ProviderClass::Hub => Arc::new(HubHandler::new(info, api, services)),
		}
	}

	/// Handler backed by the provider's HTTP API, with a client from `cache`
	pub fn create_http(
		info: ProviderInfo,
		config: HttpApiConfig,
		cache: &ClientCache,
		services: ChainServices,
		rfq_options: RfqOptions,
	) -> ProviderResult<Arc<dyn ProviderHandler>> {
		let api = HttpProviderApi::new(config, cache)?;
		Ok(Self::create(info, Arc::new(api), services, rfq_options))
	}
}

/// Provider id to handler map, built once at startup
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
	handlers: HashMap<String, Arc<dyn ProviderHandler>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a handler under its provider id, replacing any previous one
	pub fn register(&mut self, handler: Arc<dyn ProviderHandler>) {
		let id = handler.id().to_string();
		info!("Registered {} provider '{}'", handler.class(), id);
		self.handlers.insert(id, handler);
	}

	pub fn get(&self, provider_id: &str) -> Option<Arc<dyn ProviderHandler>> {
		self.handlers.get(provider_id).cloned()
	}

	pub fn all(&self) -> impl Iterator<Item = &Arc<dyn ProviderHandler>> {
		self.handlers.values()
	}

	/// Registered provider ids, sorted
	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.handlers.keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Handlers able to serve a route between the two chains
	pub fn supporting_route(&self, from_chain: &str, to_chain: &str) -> Vec<Arc<dyn ProviderHandler>> {
		let mut handlers: Vec<_> = self
			.handlers
			.values()
			.filter(|h| h.supports_route(from_chain, to_chain))
			.cloned()
			.collect();
		handlers.sort_by(|a, b| a.id().cmp(b.id()));
		handlers
	}
}
