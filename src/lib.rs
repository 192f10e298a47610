//! preview-broker - token-indexed media previews for model directories
//!
//! This crate provides:
//! - Path resolution confined to a set of trusted root directories
//! - Sibling preview discovery for model artifacts
//! - A lazily expiring in-memory token cache
//! - An HTTP boundary that mints tokens and streams media for them

pub mod api;
pub mod config;
pub mod core;
pub mod logging;
pub mod media;
pub mod token;

// Re-export commonly used items
pub use api::{BrokerServer, BrokerState};
pub use config::{BrokerConfig, ConfigStore, ConfigStoreConfig};
pub use crate::core::error::{BrokerError, Result};
pub use media::{Category, FolderRegistry, PathResolver, StaticFolderRegistry};
pub use token::{TokenCache, DEFAULT_TOKEN_TTL_SECS};
