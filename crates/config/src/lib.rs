//! xswap Configuration
//!
//! Settings, configuration loading and startup logging.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, load_config_from_str, ConfigLoadError};
pub use settings::{
	ConfigValidationError, FeatureSettings, LogFormat, LoggingSettings, PolicySettings,
	ProviderAuthSettings, ProviderSettings, QuoteSettings, Settings, TimeoutSettings,
};
pub use startup_logger::{
	log_service_info, log_service_shutdown, log_settings_summary, log_startup_complete,
};
