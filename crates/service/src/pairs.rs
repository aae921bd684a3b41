//! Pair discovery from the static reference map loaded at startup

use std::collections::BTreeMap;
use xswap_types::SwapPair;

/// Source asset slug to the destination slugs it can be swapped into
#[derive(Debug, Clone, Default)]
pub struct PairCatalog {
	pairs: BTreeMap<String, Vec<String>>,
}

impl PairCatalog {
	pub fn new<I, D>(entries: I) -> Self
	where
		I: IntoIterator<Item = (String, D)>,
		D: IntoIterator<Item = String>,
	{
		let mut pairs: BTreeMap<String, Vec<String>> = BTreeMap::new();
		for (from, destinations) in entries {
			let targets = pairs.entry(from.clone()).or_default();
			for to in destinations {
				if to != from && !targets.contains(&to) {
					targets.push(to);
				}
			}
		}
		pairs.retain(|_, targets| !targets.is_empty());
		Self { pairs }
	}

	/// Every listed pair, sorted by source then by listing order
	pub fn supported_pairs(&self) -> Vec<SwapPair> {
		self.pairs
			.iter()
			.flat_map(|(from, targets)| targets.iter().map(move |to| SwapPair::new(from, to)))
			.collect()
	}

	pub fn destinations(&self, from: &str) -> &[String] {
		self.pairs.get(from).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn contains(&self, pair: &SwapPair) -> bool {
		self.destinations(&pair.from).contains(&pair.to)
	}

	pub fn len(&self) -> usize {
		self.pairs.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}
}
