//! Where a provider API key comes from
//!
//! Keys are written either as a table, `key = { type = "env", value = "HASHFLOW_API_KEY" }`,
//! or in the short form `key = "env:HASHFLOW_API_KEY"`. A string without the
//! `env:` prefix is the key itself and is flagged at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use xswap_types::ApiKey;

const ENV_PREFIX: &str = "env:";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "KeyRepr", into = "KeyRepr")]
pub enum ConfigurableValue {
	/// Name of the environment variable holding the key
	Env(String),
	/// The key itself, written into the config file
	Plain(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum KeyRepr {
	Table {
		#[serde(rename = "type")]
		value_type: ValueType,
		value: String,
	},
	Short(String),
}

impl From<KeyRepr> for ConfigurableValue {
	fn from(repr: KeyRepr) -> Self {
		match repr {
			KeyRepr::Table {
				value_type: ValueType::Env,
				value,
			} => Self::Env(value),
			KeyRepr::Table {
				value_type: ValueType::Plain,
				value,
			} => Self::Plain(value),
			KeyRepr::Short(value) => Self::from(value),
		}
	}
}

impl From<ConfigurableValue> for KeyRepr {
	fn from(value: ConfigurableValue) -> Self {
		let value_type = value.value_type();
		let (ConfigurableValue::Env(value) | ConfigurableValue::Plain(value)) = value;
		KeyRepr::Table { value_type, value }
	}
}

impl ConfigurableValue {
	pub fn from_env(var: &str) -> Self {
		Self::Env(var.to_string())
	}

	pub fn from_plain(key: &str) -> Self {
		Self::Plain(key.to_string())
	}

	pub fn value_type(&self) -> ValueType {
		match self {
			Self::Env(_) => ValueType::Env,
			Self::Plain(_) => ValueType::Plain,
		}
	}

	/// Read the variable now; plain keys are returned as written
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self {
			Self::Env(var) => std::env::var(var)
				.map_err(|_| ConfigurableValueError::EnvironmentVariableNotFound(var.clone())),
			Self::Plain(key) => Ok(key.clone()),
		}
	}

	/// Resolve straight into an [`ApiKey`] so the raw string never lingers
	pub fn resolve_api_key(&self) -> Result<ApiKey, ConfigurableValueError> {
		let key = self.resolve()?;
		if key.trim().is_empty() {
			return Err(ConfigurableValueError::Empty(self.description()));
		}
		Ok(ApiKey::new(key))
	}

	/// Plain keys live in the config file
	pub fn is_insecure(&self) -> bool {
		matches!(self, Self::Plain(_))
	}

	/// Where the key comes from, safe for logs
	pub fn description(&self) -> String {
		match self {
			Self::Env(var) => format!("environment variable '{}'", var),
			Self::Plain(_) => "key in the config file".to_string(),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),
	#[error("Empty API key from {0}")]
	Empty(String),
}

impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Env(var) => write!(f, "{}{}", ENV_PREFIX, var),
			Self::Plain(_) => f.write_str("plain:[REDACTED]"),
		}
	}
}

impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		match value.strip_prefix(ENV_PREFIX) {
			Some(var) => Self::from_env(var),
			None => Self::from_plain(value),
		}
	}
}

impl From<String> for ConfigurableValue {
	fn from(value: String) -> Self {
		Self::from(value.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::loader::load_config_from_str;
	use crate::settings::ProviderAuthSettings;
	use std::env;

	fn hashflow_auth(auth: &str) -> ProviderAuthSettings {
		let settings = load_config_from_str(&format!(
			r#"
[providers.hashflow]
provider_id = "hashflow"
kind = "rfq"
endpoint = "https://api.hashflow.example"
auth = {auth}
"#
		))
		.unwrap();
		settings.providers["hashflow"].auth.clone().unwrap()
	}

	#[test]
	fn test_table_key_reads_environment() {
		env::set_var("XSWAP_CV_HASHFLOW_KEY", "hf-live-123");

		let auth = hashflow_auth(
			r#"{ header = "X-Api-Key", key = { type = "env", value = "XSWAP_CV_HASHFLOW_KEY" } }"#,
		);
		assert_eq!(auth.header.as_deref(), Some("X-Api-Key"));
		assert_eq!(auth.key, ConfigurableValue::from_env("XSWAP_CV_HASHFLOW_KEY"));
		assert!(!auth.key.is_insecure());
		assert_eq!(auth.key.resolve_api_key().unwrap().expose(), "hf-live-123");

		env::remove_var("XSWAP_CV_HASHFLOW_KEY");
	}

	#[test]
	fn test_short_form_key() {
		let auth = hashflow_auth(r#"{ key = "env:XSWAP_CV_SHORT_KEY" }"#);
		assert!(auth.header.is_none());
		assert_eq!(auth.key, ConfigurableValue::Env("XSWAP_CV_SHORT_KEY".into()));

		let auth = hashflow_auth(r#"{ key = "hf-inline" }"#);
		assert!(auth.key.is_insecure());
		assert_eq!(auth.key.resolve_api_key().unwrap().expose(), "hf-inline");
	}

	#[test]
	fn test_unset_variable_names_it() {
		let key = ConfigurableValue::from_env("XSWAP_CV_UNSET_KEY");
		match key.resolve_api_key() {
			Err(ConfigurableValueError::EnvironmentVariableNotFound(var)) => {
				assert_eq!(var, "XSWAP_CV_UNSET_KEY")
			},
			other => panic!("expected a missing variable, got {other:?}"),
		}
	}

	#[test]
	fn test_blank_key_is_rejected() {
		env::set_var("XSWAP_CV_BLANK_KEY", "  ");
		let err = ConfigurableValue::from_env("XSWAP_CV_BLANK_KEY")
			.resolve_api_key()
			.unwrap_err();
		assert_eq!(
			err.to_string(),
			"Empty API key from environment variable 'XSWAP_CV_BLANK_KEY'"
		);
		env::remove_var("XSWAP_CV_BLANK_KEY");

		assert!(matches!(
			ConfigurableValue::from_plain("").resolve_api_key(),
			Err(ConfigurableValueError::Empty(_))
		));
	}

	#[test]
	fn test_inline_key_never_printed() {
		let key = ConfigurableValue::from("hf-secret");
		assert_eq!(key.to_string(), "plain:[REDACTED]");
		assert_eq!(key.description(), "key in the config file");
		assert!(!format!("{:?}", key.resolve_api_key().unwrap()).contains("hf-secret"));
	}

	#[test]
	fn test_serializes_as_table() {
		let json = serde_json::to_value(ConfigurableValue::from("env:HASHFLOW_API_KEY")).unwrap();
		assert_eq!(
			json,
			serde_json::json!({ "type": "env", "value": "HASHFLOW_API_KEY" })
		);
	}
}
