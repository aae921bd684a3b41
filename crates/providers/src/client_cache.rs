//! HTTP client cache for provider quote APIs
//!
//! Provides per-provider client instances with connection pooling and keep-alive.

use dashmap::DashMap;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use xswap_types::{ApiKey, ProviderError, ProviderResult};

/// Configuration for creating pooled HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	pub base_url: String,
	/// Provider identifier for cache differentiation
	pub provider_id: String,
	pub max_idle_per_host: usize,
	pub keep_alive_timeout_ms: u64,
	/// Default headers, including any authentication header
	pub headers: Vec<(String, String)>,
}

impl ClientConfig {
	pub fn new(provider_id: &str, base_url: &str, extra_headers: &HashMap<String, String>) -> Self {
		let mut headers = vec![
			("User-Agent".to_string(), "xswap/0.1".to_string()),
			("Content-Type".to_string(), "application/json".to_string()),
		];
		let mut extra: Vec<_> = extra_headers
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect();
		// Stable order so equal configs hash equally
		extra.sort();
		headers.extend(extra);

		Self {
			base_url: base_url.to_string(),
			provider_id: provider_id.to_string(),
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			headers,
		}
	}
}

/// Authentication applied to a provider's client
#[derive(Debug, Clone)]
pub enum AuthConfig {
	None,
	Bearer { token: ApiKey },
	ApiKey { header: String, key: ApiKey },
}

impl AuthConfig {
	pub fn bearer(token: Option<ApiKey>) -> Self {
		match token {
			Some(token) => Self::Bearer { token },
			None => Self::None,
		}
	}

	pub fn api_key(header: &str, key: ApiKey) -> Self {
		Self::ApiKey {
			header: header.to_string(),
			key,
		}
	}

	fn apply(&self, config: &mut ClientConfig) {
		match self {
			AuthConfig::None => {},
			AuthConfig::Bearer { token } => config.headers.push((
				"Authorization".to_string(),
				format!("Bearer {}", token.expose()),
			)),
			AuthConfig::ApiKey { header, key } => config
				.headers
				.push((header.clone(), key.expose().to_string())),
		}
	}
}

#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache of HTTP clients keyed by provider configuration, with TTL
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// Create a new client cache with default 30-minute TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Process-wide cache shared by every HTTP provider
	pub fn shared() -> Self {
		GLOBAL_CLIENT_CACHE.clone()
	}

	pub fn get_client(&self, config: &ClientConfig) -> ProviderResult<Arc<Client>> {
		self.clients.remove_if(config, |_, cached| {
			let expired = cached.is_expired(self.ttl);
			if expired {
				warn!(
					"Client cache expired for {} (age: {:?}), will create new client",
					config.base_url,
					cached.created_at.elapsed()
				);
			}
			expired
		});

		if let Some(cached) = self.clients.get(config) {
			debug!("Reusing cached client for {}", config.base_url);
			return Ok(cached.client.clone());
		}

		debug!("Creating new client for {}", config.base_url);
		let cached = CachedClient::new(Self::create_client(config)?);

		use dashmap::mapref::entry::Entry;
		match self.clients.entry(config.clone()) {
			// Another task created one first
			Entry::Occupied(entry) => Ok(entry.get().client.clone()),
			Entry::Vacant(entry) => Ok(entry.insert(cached).client.clone()),
		}
	}

	pub fn get_client_with_auth(
		&self,
		config: &ClientConfig,
		auth: &AuthConfig,
	) -> ProviderResult<Arc<Client>> {
		let mut config = config.clone();
		auth.apply(&mut config);
		self.get_client(&config)
	}

	fn create_client(config: &ClientConfig) -> ProviderResult<Client> {
		let mut header_map = reqwest::header::HeaderMap::new();
		for (key, value) in &config.headers {
			if let (Ok(name), Ok(value)) = (
				reqwest::header::HeaderName::from_bytes(key.as_bytes()),
				reqwest::header::HeaderValue::from_str(value),
			) {
				header_map.insert(name, value);
			}
		}

		ClientBuilder::new()
			.pool_max_idle_per_host(config.max_idle_per_host)
			.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
			.tcp_keepalive(Duration::from_secs(60))
			.default_headers(header_map)
			.build()
			.map_err(ProviderError::HttpError)
	}

	/// Remove all expired clients, returning how many were dropped
	pub fn cleanup_expired(&self) -> usize {
		let before = self.clients.len();
		self.clients.retain(|_, cached| !cached.is_expired(self.ttl));
		let removed = before.saturating_sub(self.clients.len());
		if removed > 0 {
			debug!("Cleaned up {} expired clients from cache", removed);
		}
		removed
	}

	pub fn len(&self) -> usize {
		self.clients.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clients.is_empty()
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}

lazy_static::lazy_static! {
	static ref GLOBAL_CLIENT_CACHE: ClientCache = ClientCache::new();
}
