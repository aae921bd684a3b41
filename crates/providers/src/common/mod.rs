//! Building blocks shared by every handler variant

pub mod evm;
pub mod generators;
pub mod services;
pub mod validation;

pub use generators::GeneratedStep;
pub use services::ChainServices;
pub use validation::validate_process_steps;
