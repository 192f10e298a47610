//! Configuration Storage Implementation
//!
//! Provides JSON file-based configuration storage with:
//! - Atomic writes using temp file + rename
//! - Thread-safe access via RwLock
//! - Default configuration generation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::logging::LoggingConfig;
use crate::media::StaticFolderRegistry;
use crate::token::DEFAULT_TOKEN_TTL_SECS;

/// Default HTTP port (the host UI's usual port)
pub const DEFAULT_SERVER_PORT: u16 = 8188;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration store settings
#[derive(Debug, Clone)]
pub struct ConfigStoreConfig {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Whether to create default config if not exists
    pub create_default: bool,
}

impl Default for ConfigStoreConfig {
    fn default() -> Self {
        let app_data = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("preview-broker");

        Self {
            config_path: app_data.join("config.json"),
            create_default: true,
        }
    }
}

impl ConfigStoreConfig {
    /// Settings for an explicit config file path
    pub fn at(config_path: PathBuf) -> Self {
        Self {
            config_path,
            ..Default::default()
        }
    }
}

/// HTTP boundary settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (an IP address, not a hostname)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// First segment of the API prefix
    #[serde(default = "default_author")]
    pub author: String,

    /// Second segment of the API prefix
    #[serde(default = "default_package")]
    pub package: String,

    /// Extra origins allowed by CORS (none = same-origin only)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_author() -> String {
    "jupo".to_string()
}

fn default_package() -> String {
    "PreviewModel".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            author: default_author(),
            package: default_package(),
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Route for an API operation, e.g. `/jupo/PreviewModel/mediaPath`
    pub fn endpoint(&self, part: &str) -> String {
        format!("/{}/{}/{}", self.author, self.package, part)
    }

    /// Address to bind
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("bad listen address {}:{}: {}", self.host, self.port, e)))
    }
}

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// HTTP settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Named groups of trusted base directories
    #[serde(default)]
    pub folders: BTreeMap<String, Vec<PathBuf>>,

    /// Input directory, always trusted when it exists
    #[serde(default)]
    pub input_directory: Option<PathBuf>,

    /// Token lifetime in seconds
    #[serde(default = "default_ttl")]
    pub token_ttl_secs: u64,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Last modified timestamp
    #[serde(default = "default_timestamp")]
    pub last_modified: String,
}

fn default_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            folders: BTreeMap::new(),
            input_directory: None,
            token_ttl_secs: default_ttl(),
            logging: LoggingConfig::default(),
            last_modified: default_timestamp(),
        }
    }
}

impl BrokerConfig {
    /// Check invariants that serde defaults cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid("token_ttl_secs must be positive".to_string()));
        }
        for (name, segment) in [("author", &self.server.author), ("package", &self.server.package)] {
            if segment.is_empty() || segment.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "server.{} must be a non-empty path segment",
                    name
                )));
            }
        }
        self.server.socket_addr()?;
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Folder registry described by this configuration
    pub fn folder_registry(&self) -> StaticFolderRegistry {
        StaticFolderRegistry::new(self.folders.clone(), self.input_directory.clone())
    }
}

/// Configuration store with thread-safe access
pub struct ConfigStore {
    config: Arc<RwLock<BrokerConfig>>,
    settings: ConfigStoreConfig,
}

impl ConfigStore {
    /// Create a new configuration store
    pub async fn new(settings: ConfigStoreConfig) -> ConfigResult<Self> {
        let config = if settings.config_path.exists() {
            Self::load_from_file(&settings.config_path).await?
        } else if settings.create_default {
            if let Some(parent) = settings.config_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let default_config = BrokerConfig::default();
            Self::save_to_file(&settings.config_path, &default_config).await?;
            default_config
        } else {
            return Err(ConfigError::NotFound(settings.config_path.clone()));
        };

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            settings,
        })
    }

    /// Load configuration from file
    async fn load_from_file(path: &Path) -> ConfigResult<BrokerConfig> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: BrokerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file with atomic write
    async fn save_to_file(path: &Path, config: &BrokerConfig) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(config)?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await?;
        tokio::fs::rename(&temp_path, path).await?;

        Ok(())
    }

    /// Get current configuration (read-only)
    pub async fn get(&self) -> BrokerConfig {
        self.config.read().await.clone()
    }

    /// Get the config file path
    pub fn config_path(&self) -> &Path {
        &self.settings.config_path
    }
}
