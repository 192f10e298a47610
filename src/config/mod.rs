//! Configuration Management Module
//!
//! Provides persistent configuration storage with:
//! - JSON file-based storage with per-field defaults
//! - Validation on load
//! - Atomic writes
//! - Thread-safe access

mod storage;

pub use storage::{
    BrokerConfig, ConfigError, ConfigResult, ConfigStore, ConfigStoreConfig, ServerConfig,
    DEFAULT_SERVER_PORT,
};
