//! Configuration loading utilities

use config::{Config, ConfigError, Environment, File, FileFormat};
use thiserror::Error;
use tracing::debug;

use crate::settings::{ConfigValidationError, Settings};

/// Default file location, without extension; any format the `config` crate reads
pub const DEFAULT_CONFIG_PATH: &str = "config/xswap";
/// Environment override prefix, e.g. `XSWAP__TIMEOUTS__PER_PROVIDER_MS=2000`
pub const ENV_PREFIX: &str = "XSWAP";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Source(#[from] ConfigError),
	#[error("Invalid configuration: {0}")]
	Invalid(#[from] ConfigValidationError),
}

/// Load `config/xswap.*` (optional) layered with `XSWAP__` environment variables
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var("XSWAP_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
	load_config_from(&path)
}

pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	debug!("Loading configuration from {}", path);
	let source = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(env_source())
		.build()?;
	finish(source)
}

/// Parse an in-memory TOML document, still layered with the environment
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigLoadError> {
	let source = Config::builder()
		.add_source(File::from_str(toml, FileFormat::Toml))
		.add_source(env_source())
		.build()?;
	finish(source)
}

fn env_source() -> Environment {
	Environment::with_prefix(ENV_PREFIX)
		.prefix_separator("__")
		.separator("__")
		.list_separator(",")
		.with_list_parse_key("quotes.priority")
		.with_list_parse_key("features.blocked_providers")
		.try_parsing(true)
}

fn finish(source: Config) -> Result<Settings, ConfigLoadError> {
	let settings: Settings = source.try_deserialize()?;
	settings.validate()?;
	Ok(settings)
}
