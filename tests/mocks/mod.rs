//! Centralized mocks and fixtures for the end-to-end tests
//!
//! In-memory chain collaborators, scripted provider APIs and ready-made
//! settings shared by every test file.

#![allow(dead_code)]

pub mod chain;
pub mod configs;
pub mod providers;

#[allow(unused_imports)]
pub use chain::InMemoryChain;
#[allow(unused_imports)]
pub use providers::MockQuoteApi;
