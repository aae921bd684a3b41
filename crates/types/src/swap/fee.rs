//! Per-step fee bookkeeping

use serde::{Deserialize, Serialize};

use crate::models::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeType {
	/// Paid by the signer in the step's fee token
	Network,
	/// Charged by the provider, deducted from the output
	Protocol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeComponent {
	pub fee_type: FeeType,
	pub amount: Amount,
	pub token_slug: String,
}

impl FeeComponent {
	pub fn network(amount: Amount, token_slug: impl Into<String>) -> Self {
		Self {
			fee_type: FeeType::Network,
			amount,
			token_slug: token_slug.into(),
		}
	}

	pub fn protocol(amount: Amount, token_slug: impl Into<String>) -> Self {
		Self {
			fee_type: FeeType::Protocol,
			amount,
			token_slug: token_slug.into(),
		}
	}
}

/// Fee information attached to one step of a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFeeInfo {
	pub fee_components: Vec<FeeComponent>,
	pub default_fee_token: String,
	pub fee_options: Vec<String>,
	/// Network fee priced in each non-default option
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub option_fees: Vec<FeeComponent>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub selected_fee_token: Option<String>,
}

impl StepFeeInfo {
	/// Fee info with no components (DEFAULT anchor and placeholder steps)
	pub fn zero(default_fee_token: impl Into<String>) -> Self {
		let token = default_fee_token.into();
		Self {
			fee_components: Vec::new(),
			fee_options: vec![token.clone()],
			default_fee_token: token,
			option_fees: Vec::new(),
			selected_fee_token: None,
		}
	}

	/// Single network fee paid in `token`
	pub fn network(amount: Amount, token: impl Into<String>) -> Self {
		let token = token.into();
		Self {
			fee_components: vec![FeeComponent::network(amount, token.clone())],
			fee_options: vec![token.clone()],
			default_fee_token: token,
			option_fees: Vec::new(),
			selected_fee_token: None,
		}
	}

	pub fn with_component(mut self, component: FeeComponent) -> Self {
		self.fee_components.push(component);
		self
	}

	/// Offer `token` as an alternative fee token, charging `amount` of it
	pub fn with_fee_option(mut self, token: impl Into<String>, amount: Amount) -> Self {
		let token = token.into();
		if token == self.default_fee_token {
			return self;
		}
		if !self.fee_options.contains(&self.default_fee_token) {
			self.fee_options.insert(0, self.default_fee_token.clone());
		}
		if !self.fee_options.contains(&token) {
			self.fee_options.push(token.clone());
		}
		self.option_fees.retain(|c| c.token_slug != token);
		self.option_fees.push(FeeComponent::network(amount, token));
		self
	}

	/// Token the signer pays network fees in
	pub fn fee_token(&self) -> &str {
		self.selected_fee_token
			.as_deref()
			.unwrap_or(&self.default_fee_token)
	}

	/// Network fees charged to the signer in the active fee token
	///
	/// A selected option without a price is charged the default amount.
	pub fn charged_amount(&self) -> Amount {
		let default_charge: Amount = self
			.fee_components
			.iter()
			.filter(|c| c.fee_type == FeeType::Network && c.token_slug == self.default_fee_token)
			.map(|c| c.amount.clone())
			.sum();
		match self.selected_fee_token.as_deref() {
			Some(token) if token != self.default_fee_token => self
				.option_fees
				.iter()
				.find(|c| c.token_slug == token)
				.map(|c| c.amount.clone())
				.unwrap_or(default_charge),
			_ => default_charge,
		}
	}

	/// Sum of all components denominated in `token`
	pub fn total_in(&self, token: &str) -> Amount {
		self.fee_components
			.iter()
			.filter(|c| c.token_slug == token)
			.map(|c| c.amount.clone())
			.sum()
	}

	pub fn is_zero(&self) -> bool {
		self.fee_components.iter().all(|c| c.amount.is_zero())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_charged_amount_only_counts_network_fees_in_fee_token() {
		let fee = StepFeeInfo::network(Amount::from(60u64), "statemint-USDT")
			.with_component(FeeComponent::protocol(Amount::from(5u64), "statemint-USDT"))
			.with_component(FeeComponent::network(Amount::from(7u64), "statemint-DOT"));

		assert_eq!(fee.fee_token(), "statemint-USDT");
		assert_eq!(fee.charged_amount(), Amount::from(60u64));
		assert_eq!(fee.total_in("statemint-USDT"), Amount::from(65u64));
	}

	#[test]
	fn test_selected_fee_token_charges_its_price() {
		let mut fee = StepFeeInfo::network(Amount::from(10u64), "hydradx-HDX")
			.with_fee_option("hydradx-USDT", Amount::from(4u64));
		assert_eq!(fee.fee_options, vec!["hydradx-HDX", "hydradx-USDT"]);

		fee.selected_fee_token = Some("hydradx-USDT".into());
		assert_eq!(fee.fee_token(), "hydradx-USDT");
		assert_eq!(fee.charged_amount(), Amount::from(4u64));
	}

	#[test]
	fn test_unpriced_selection_keeps_default_charge() {
		let mut fee = StepFeeInfo::network(Amount::from(10u64), "hydradx-HDX");
		fee.selected_fee_token = Some("hydradx-DOT".into());
		assert_eq!(fee.charged_amount(), Amount::from(10u64));
	}
}
