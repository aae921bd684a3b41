//! Provider handler variants

pub mod amm;
pub mod cross_chain;
pub mod hub;
pub mod rfq;

pub use amm::AmmHandler;
pub use cross_chain::CrossChainAmmHandler;
pub use hub::HubHandler;
pub use rfq::{RfqHandler, RfqOptions};
