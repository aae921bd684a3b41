//! Path resolution
//!
//! Path finding itself belongs to the liquidity graph service. The resolver
//! only turns its answer into a checked [`SwapPath`] that starts and ends
//! where the pair says.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use xswap_types::{
	LiquidityGraph, SwapError, SwapErrorKind, SwapPair, SwapPath, SwapResult,
};

/// Trait for resolving a pair into an action path
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PathResolverTrait: Send + Sync {
	/// Resolve `pair` into a 1 to 3 action path, NO_PATH when unreachable
	async fn resolve(&self, pair: &SwapPair) -> SwapResult<SwapPath>;
}

pub struct PathResolver {
	graph: Arc<dyn LiquidityGraph>,
}

impl PathResolver {
	pub fn new(graph: Arc<dyn LiquidityGraph>) -> Self {
		Self { graph }
	}
}

/// Whether the path starts at the pair's source (or its top-up alternative) and ends at its target
fn covers_pair(path: &SwapPath, pair: &SwapPair) -> bool {
	let start = &path.first().pair.from;
	let starts_ok =
		*start == pair.from || pair.alternative_asset.as_deref() == Some(start.as_str());
	starts_ok && path.last().pair.to == pair.to
}

#[async_trait]
impl PathResolverTrait for PathResolver {
	async fn resolve(&self, pair: &SwapPair) -> SwapResult<SwapPath> {
		let actions = self.graph.find_path(pair).await.map_err(|e| {
			warn!("Liquidity graph failed for {}: {}", pair, e);
			SwapError::internal(format!("Liquidity graph unavailable: {e}"))
		})?;

		let actions = match actions {
			Some(actions) if !actions.is_empty() => actions,
			_ => {
				debug!("No path for {}", pair);
				return Err(SwapError::new(SwapErrorKind::NoPath));
			},
		};

		let path = SwapPath::new(actions).map_err(|e| {
			warn!("Liquidity graph returned a malformed path for {}: {}", pair, e);
			SwapError::internal(format!("Malformed path: {e}"))
		})?;
		if !covers_pair(&path, pair) {
			warn!("Liquidity graph returned a path that does not cover {}", pair);
			return Err(SwapError::internal("Resolved path does not match the pair"));
		}

		debug!("Resolved {} into {} actions", pair, path.len());
		Ok(path)
	}
}
