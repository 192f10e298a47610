//! Media Preview HTTP Server
//!
//! This module exposes the resolver and token cache over HTTP:
//! - `GET  /{author}/{package}/supportedExtensions`
//! - `POST /{author}/{package}/mediaPath`
//! - `GET  /{author}/{package}/cacheStatus`
//! - `GET  /media?token=...`
//! - `GET  /health`
//!
//! Security features:
//! - Paths are only ever resolved inside trusted roots
//! - Clients see opaque tokens, never filesystem paths
//! - Security response headers (X-Content-Type-Options, X-Frame-Options)

mod content_type;
mod error;
mod routes;
mod server;

pub use content_type::{content_type_for, fallback_content_type, guess_content_type};
pub use error::{ApiError, ServerError};
pub use routes::{
    cache_status, request_media_token, serve_media, supported_extensions, CacheStatus,
    MediaPathRequest, MediaTokenResponse, TokenParams,
};
pub use server::{BrokerServer, BrokerState};
