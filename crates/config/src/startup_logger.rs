//! Startup and shutdown logging

use std::env;
use tracing::{info, warn};

use crate::settings::Settings;

/// Logs service information at startup
pub fn log_service_info() {
	info!("=== xswap core starting ===");
	info!("Service: xswap v{}", env!("CARGO_PKG_VERSION"));
	info!("Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("Working directory: {}", cwd.display());
	}
	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("RUST_LOG: {}", rust_log);
	}
	if let Ok(config_path) = env::var("XSWAP_CONFIG_PATH") {
		info!("Config path: {}", config_path);
	}

	info!(
		"Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Summary of what was loaded: providers, pairs and switches
pub fn log_settings_summary(settings: &Settings) {
	let enabled = settings.enabled_providers();
	info!(
		"Providers: {} configured, {} enabled",
		settings.providers.len(),
		enabled.len()
	);
	for provider in enabled {
		info!(
			"  {} ({}) -> {} [timeout {}ms]",
			provider.provider_id,
			provider.kind,
			provider.endpoint,
			settings.provider_timeout(provider).as_millis()
		);
		if let Some(auth) = &provider.auth {
			if auth.key.is_insecure() {
				warn!(
					"Provider {} uses a plain API key from the config file",
					provider.provider_id
				);
			}
		}
	}
	info!(
		"Pairs: {} source assets in the reference map",
		settings.pairs.len()
	);
	if settings.features.maintenance {
		warn!("Maintenance mode is on, every swap will be refused");
	}
	if !settings.features.blocked_providers.is_empty() {
		warn!(
			"Blocked providers: {}",
			settings.features.blocked_providers.join(", ")
		);
	}
}

pub fn log_startup_complete(provider_count: usize) {
	info!("xswap core ready with {} provider handlers", provider_count);
}

pub fn log_service_shutdown() {
	info!(
		"xswap core shutting down at {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}
