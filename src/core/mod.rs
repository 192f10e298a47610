//! Core Module
//!
//! Crate-wide error type and small path helpers shared by the resolver,
//! the token cache and the HTTP layer.

pub mod error;
pub mod utils;

pub use error::{BrokerError, Result};
