//! Configuration settings structures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;
use xswap_types::{ProviderClass, ValidationPolicy};

use crate::configurable_value::ConfigurableValue;

/// Bounds for any provider request timeout
pub const MIN_TIMEOUT_MS: u64 = 100;
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
	#[serde(default)]
	pub providers: HashMap<String, ProviderSettings>,
	#[serde(default)]
	pub quotes: QuoteSettings,
	#[serde(default)]
	pub timeouts: TimeoutSettings,
	#[serde(default)]
	pub policy: PolicySettings,
	#[serde(default)]
	pub features: FeatureSettings,
	/// Static reference map: source asset slug to destination slugs
	#[serde(default)]
	pub pairs: BTreeMap<String, Vec<String>>,
	#[serde(default)]
	pub logging: LoggingSettings,
}

/// Individual provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderSettings {
	pub provider_id: String,
	/// Provider family, which also decides whether it serves cross-chain routes
	pub kind: ProviderClass,
	pub endpoint: String,
	/// Overrides `timeouts.per_provider_ms`
	#[serde(default)]
	pub timeout_ms: Option<u64>,
	#[serde(default = "default_true")]
	pub enabled: bool,
	/// Chains served; empty means any
	#[serde(default)]
	pub chains: Vec<String>,
	#[serde(default)]
	pub headers: HashMap<String, String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub auth: Option<ProviderAuthSettings>,
}

/// How the provider's API key is sent
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderAuthSettings {
	/// Header carrying the key; `Authorization: Bearer` when absent
	#[serde(default)]
	pub header: Option<String>,
	pub key: ConfigurableValue,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuoteSettings {
	/// Tie-break order between quotes with the same output
	#[serde(default)]
	pub priority: Vec<String>,
	/// Expiry applied to AMM-style quotes sent without one
	#[serde(default = "default_ttl_secs")]
	pub default_ttl_secs: u64,
	/// Expiry applied to order-book quotes sent without one
	#[serde(default = "default_order_book_ttl_secs")]
	pub order_book_ttl_secs: u64,
}

impl Default for QuoteSettings {
	fn default() -> Self {
		Self {
			priority: Vec::new(),
			default_ttl_secs: default_ttl_secs(),
			order_book_ttl_secs: default_order_book_ttl_secs(),
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeoutSettings {
	/// Per-provider quote timeout in milliseconds
	#[serde(default = "default_per_provider_ms")]
	pub per_provider_ms: u64,
	/// Interval between order status polls of RFQ providers
	#[serde(default = "default_rfq_poll_interval_ms")]
	pub rfq_poll_interval_ms: u64,
	/// How long a relayed RFQ order may take to fill
	#[serde(default = "default_rfq_fill_timeout_ms")]
	pub rfq_fill_timeout_ms: u64,
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			per_provider_ms: default_per_provider_ms(),
			rfq_poll_interval_ms: default_rfq_poll_interval_ms(),
			rfq_fill_timeout_ms: default_rfq_fill_timeout_ms(),
		}
	}
}

/// Existential deposit safety margins
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PolicySettings {
	#[serde(default = "default_ed_multiplier")]
	pub ed_multiplier: Decimal,
	#[serde(default = "default_top_up_multiplier")]
	pub top_up_multiplier: Decimal,
}

impl Default for PolicySettings {
	fn default() -> Self {
		Self {
			ed_multiplier: default_ed_multiplier(),
			top_up_multiplier: default_top_up_multiplier(),
		}
	}
}

impl From<&PolicySettings> for ValidationPolicy {
	fn from(settings: &PolicySettings) -> Self {
		Self {
			ed_multiplier: settings.ed_multiplier,
			top_up_multiplier: settings.top_up_multiplier,
		}
	}
}

/// Maintenance switches
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FeatureSettings {
	#[serde(default)]
	pub maintenance: bool,
	#[serde(default)]
	pub blocked_providers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	#[serde(default = "default_log_level")]
	pub level: String,
	#[serde(default)]
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			format: LogFormat::default(),
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	#[default]
	Pretty,
	Compact,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
	#[error("Provider '{key}' declares a different provider_id '{provider_id}'")]
	ProviderIdMismatch { key: String, provider_id: String },

	#[error("Provider '{0}' has an empty endpoint")]
	EmptyEndpoint(String),

	#[error("Timeout {field} = {value}ms is outside 100..=30000ms")]
	TimeoutOutOfRange { field: String, value: u64 },

	#[error("RFQ poll interval {poll_ms}ms must be positive and below the fill timeout {fill_ms}ms")]
	InvalidRfqPolling { poll_ms: u64, fill_ms: u64 },

	#[error("Quote TTL {field} must be positive")]
	ZeroTtl { field: String },

	#[error("Multiplier {field} = {value} must be at least 1")]
	InvalidMultiplier { field: String, value: Decimal },

	#[error("Priority list names unknown provider '{0}'")]
	UnknownPriorityProvider(String),

	#[error("Invalid log level '{0}'")]
	InvalidLogLevel(String),
}

impl Settings {
	/// Enabled providers only, sorted by id
	pub fn enabled_providers(&self) -> Vec<&ProviderSettings> {
		let mut providers: Vec<_> = self.providers.values().filter(|p| p.enabled).collect();
		providers.sort_by(|a, b| a.provider_id.cmp(&b.provider_id));
		providers
	}

	pub fn provider_timeout(&self, provider: &ProviderSettings) -> Duration {
		Duration::from_millis(provider.timeout_ms.unwrap_or(self.timeouts.per_provider_ms))
	}

	pub fn blocked_providers(&self) -> HashSet<String> {
		self.features.blocked_providers.iter().cloned().collect()
	}

	pub fn validation_policy(&self) -> ValidationPolicy {
		ValidationPolicy::from(&self.policy)
	}

	/// Check bounds and cross references, reporting the first problem found
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		check_timeout("timeouts.per_provider_ms", self.timeouts.per_provider_ms)?;

		let mut keys: Vec<_> = self.providers.keys().collect();
		keys.sort();
		for key in keys {
			let provider = &self.providers[key];
			if provider.provider_id != *key {
				return Err(ConfigValidationError::ProviderIdMismatch {
					key: key.clone(),
					provider_id: provider.provider_id.clone(),
				});
			}
			if provider.endpoint.trim().is_empty() {
				return Err(ConfigValidationError::EmptyEndpoint(key.clone()));
			}
			if let Some(timeout_ms) = provider.timeout_ms {
				check_timeout(&format!("providers.{key}.timeout_ms"), timeout_ms)?;
			}
		}

		let timeouts = &self.timeouts;
		if timeouts.rfq_poll_interval_ms == 0
			|| timeouts.rfq_poll_interval_ms >= timeouts.rfq_fill_timeout_ms
		{
			return Err(ConfigValidationError::InvalidRfqPolling {
				poll_ms: timeouts.rfq_poll_interval_ms,
				fill_ms: timeouts.rfq_fill_timeout_ms,
			});
		}

		if self.quotes.default_ttl_secs == 0 {
			return Err(ConfigValidationError::ZeroTtl {
				field: "quotes.default_ttl_secs".to_string(),
			});
		}
		if self.quotes.order_book_ttl_secs == 0 {
			return Err(ConfigValidationError::ZeroTtl {
				field: "quotes.order_book_ttl_secs".to_string(),
			});
		}

		for (field, value) in [
			("policy.ed_multiplier", self.policy.ed_multiplier),
			("policy.top_up_multiplier", self.policy.top_up_multiplier),
		] {
			if value < Decimal::ONE {
				return Err(ConfigValidationError::InvalidMultiplier {
					field: field.to_string(),
					value,
				});
			}
		}

		if let Some(unknown) = self
			.quotes
			.priority
			.iter()
			.find(|id| !self.providers.contains_key(*id))
		{
			return Err(ConfigValidationError::UnknownPriorityProvider(
				unknown.clone(),
			));
		}

		let level = self.logging.level.to_ascii_lowercase();
		if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
			return Err(ConfigValidationError::InvalidLogLevel(
				self.logging.level.clone(),
			));
		}

		Ok(())
	}
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigValidationError> {
	if (MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
		Ok(())
	} else {
		Err(ConfigValidationError::TimeoutOutOfRange {
			field: field.to_string(),
			value,
		})
	}
}

fn default_true() -> bool {
	true
}

fn default_ttl_secs() -> u64 {
	60
}

fn default_order_book_ttl_secs() -> u64 {
	15
}

fn default_per_provider_ms() -> u64 {
	5_000
}

fn default_rfq_poll_interval_ms() -> u64 {
	2_000
}

fn default_rfq_fill_timeout_ms() -> u64 {
	120_000
}

fn default_ed_multiplier() -> Decimal {
	Decimal::new(12, 1)
}

fn default_top_up_multiplier() -> Decimal {
	Decimal::TWO
}

fn default_log_level() -> String {
	"info".to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn provider(id: &str, kind: ProviderClass) -> ProviderSettings {
		ProviderSettings {
			provider_id: id.to_string(),
			kind,
			endpoint: format!("https://{id}.example.com"),
			timeout_ms: None,
			enabled: true,
			chains: Vec::new(),
			headers: HashMap::new(),
			name: None,
			auth: None,
		}
	}

	fn settings() -> Settings {
		let mut settings = Settings::default();
		for (id, kind) in [("uniswap", ProviderClass::Amm), ("hashflow", ProviderClass::Rfq)] {
			settings.providers.insert(id.to_string(), provider(id, kind));
		}
		settings
	}

	#[test]
	fn test_defaults_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.timeouts.per_provider_ms, 5_000);
		assert_eq!(settings.quotes.order_book_ttl_secs, 15);
		assert_eq!(settings.validation_policy(), ValidationPolicy::default());
	}

	#[test]
	fn test_enabled_providers_sorted() {
		let mut settings = settings();
		settings.providers.get_mut("uniswap").unwrap().enabled = false;
		let enabled: Vec<_> = settings
			.enabled_providers()
			.iter()
			.map(|p| p.provider_id.as_str())
			.collect();
		assert_eq!(enabled, vec!["hashflow"]);
	}

	#[test]
	fn test_provider_timeout_override() {
		let mut settings = settings();
		settings.providers.get_mut("hashflow").unwrap().timeout_ms = Some(1_500);
		assert_eq!(
			settings.provider_timeout(&settings.providers["hashflow"]),
			Duration::from_millis(1_500)
		);
		assert_eq!(
			settings.provider_timeout(&settings.providers["uniswap"]),
			Duration::from_millis(5_000)
		);
	}

	#[test]
	fn test_timeout_bounds() {
		let mut settings = settings();
		settings.timeouts.per_provider_ms = 50;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::TimeoutOutOfRange { .. })
		));

		let mut settings = self::settings();
		settings.providers.get_mut("uniswap").unwrap().timeout_ms = Some(60_000);
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::TimeoutOutOfRange { .. })
		));
	}

	#[test]
	fn test_rfq_polling_must_fit_in_fill_timeout() {
		let mut settings = settings();
		settings.timeouts.rfq_poll_interval_ms = settings.timeouts.rfq_fill_timeout_ms;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidRfqPolling { .. })
		));
	}

	#[test]
	fn test_multiplier_sanity() {
		let mut settings = settings();
		settings.policy.ed_multiplier = Decimal::new(9, 1);
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidMultiplier { .. })
		));
	}

	#[test]
	fn test_cross_references() {
		let mut settings = settings();
		settings.quotes.priority = vec!["uniswap".to_string(), "paraswap".to_string()];
		assert_eq!(
			settings.validate(),
			Err(ConfigValidationError::UnknownPriorityProvider(
				"paraswap".to_string()
			))
		);

		let mut settings = self::settings();
		settings.providers.get_mut("uniswap").unwrap().provider_id = "sushi".to_string();
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::ProviderIdMismatch { .. })
		));
	}

	#[test]
	fn test_log_level() {
		let mut settings = settings();
		settings.logging.level = "DEBUG".to_string();
		assert!(settings.validate().is_ok());
		settings.logging.level = "verbose".to_string();
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidLogLevel(_))
		));
	}
}
