//! Shared domain models used by providers, validators and the orchestrator

pub mod address;
pub mod amount;
pub mod api_key;
pub mod asset;
pub mod slippage;

pub use address::{detect_family, is_address_for_family};
pub use amount::{Amount, ParseAmountError};
pub use api_key::ApiKey;
pub use asset::{Asset, ChainFamily, ChainInfo};
pub use slippage::{InvalidSlippage, Slippage};
