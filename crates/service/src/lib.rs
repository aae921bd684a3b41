//! xswap Service
//!
//! Path resolution, quote brokering and the swap orchestrator.

pub mod orchestrator;
pub mod pairs;
pub mod path_resolver;
pub mod quote_broker;

pub use orchestrator::{FeatureFlags, SwapOrchestrator, SwapPlan};
pub use pairs::PairCatalog;
pub use path_resolver::{PathResolver, PathResolverTrait};
pub use quote_broker::{
	preferred_failure, ProviderFailure, QuoteBroker, QuoteBrokerConfig, QuoteBrokerTrait,
	QuoteOutcome,
};

#[cfg(any(test, feature = "mocks"))]
pub use path_resolver::MockPathResolverTrait;
#[cfg(any(test, feature = "mocks"))]
pub use quote_broker::MockQuoteBrokerTrait;
