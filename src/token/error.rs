//! Token redemption errors

use thiserror::Error;

/// Why a token could not be redeemed
///
/// All variants surface as "not found" to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedeemError {
    #[error("Token required")]
    Missing,

    #[error("Token not found")]
    Unknown,

    #[error("Token expired")]
    Expired,

    #[error("File not found: {path}")]
    FileVanished { path: String },
}

impl RedeemError {
    /// Message safe to send to a client (never contains a path)
    pub fn public_message(&self) -> &'static str {
        match self {
            RedeemError::Missing => "Token required",
            RedeemError::Unknown | RedeemError::Expired => "Token not found or expired",
            RedeemError::FileVanished { .. } => "File not found",
        }
    }
}
