//! Error types for the preview broker
//!
//! Each subsystem owns a `thiserror` enum; `BrokerError` wraps them for the
//! startup path where failures are fatal.

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::api::ServerError;

/// Result type alias for broker operations
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Main error type for the preview broker
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BrokerError {
    /// Whether the process can keep running after this error
    ///
    /// Only configuration and logging faults occur before the listener is
    /// bound; everything else means the service is gone.
    pub fn is_startup_error(&self) -> bool {
        matches!(self, BrokerError::Config(_) | BrokerError::Logging(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: BrokerError = ConfigError::Invalid("ttl must be positive".to_string()).into();
        assert!(err.is_startup_error());
        assert!(err.to_string().contains("ttl must be positive"));
    }

    #[test]
    fn test_server_error_is_not_startup() {
        let err: BrokerError = ServerError::BindFailed {
            reason: "address in use".to_string(),
        }
        .into();
        assert!(!err.is_startup_error());
        assert!(err.to_string().contains("address in use"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BrokerError = io.into();
        assert!(matches!(err, BrokerError::Io(_)));
    }
}
