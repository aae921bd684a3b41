//! Ready-made settings and orchestrator wiring

use std::collections::HashMap;
use std::sync::Arc;

use xswap::config::{FeatureSettings, QuoteSettings, TimeoutSettings};
use xswap::{
	ProviderApi, ProviderClass, ProviderSettings, Settings, SwapOrchestrator,
	SwapOrchestratorBuilder,
};

use super::chain::InMemoryChain;

pub struct MockConfigs;

impl MockConfigs {
	pub fn provider(id: &str, kind: ProviderClass, chains: &[&str]) -> ProviderSettings {
		ProviderSettings {
			provider_id: id.to_string(),
			kind,
			endpoint: format!("http://127.0.0.1:1/{id}"),
			timeout_ms: None,
			enabled: true,
			chains: chains.iter().map(|c| c.to_string()).collect(),
			headers: HashMap::new(),
			name: None,
			auth: None,
		}
	}

	/// Settings with fast RFQ polling and short provider timeouts
	pub fn settings(providers: Vec<ProviderSettings>) -> Settings {
		Settings {
			providers: providers
				.into_iter()
				.map(|p| (p.provider_id.clone(), p))
				.collect(),
			quotes: QuoteSettings::default(),
			timeouts: TimeoutSettings {
				per_provider_ms: 500,
				rfq_poll_interval_ms: 5,
				rfq_fill_timeout_ms: 1_000,
			},
			features: FeatureSettings::default(),
			..Default::default()
		}
	}

	/// Orchestrator over `chain` with every provider answering through its mock API
	pub fn orchestrator(
		chain: &Arc<InMemoryChain>,
		settings: Settings,
		apis: Vec<(&str, Arc<dyn ProviderApi>)>,
	) -> SwapOrchestrator {
		apis.into_iter()
			.fold(
				SwapOrchestratorBuilder::new(chain.collaborators()).with_settings(settings),
				|builder, (id, api)| builder.with_provider_api(id, api),
			)
			.build()
			.expect("test settings must build")
	}
}
