//! Provider domain model: descriptors, errors and the handler contract

pub mod errors;
pub mod models;
pub mod traits;

pub use errors::ProviderError;
pub use models::{OrderStatus, ProviderClass, ProviderInfo, QuoteRequest};
pub use traits::{ProviderApi, ProviderHandler};

#[cfg(any(test, feature = "mocks"))]
pub use traits::MockProviderApi;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
