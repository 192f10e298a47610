//! Media preview server implementation
//!
//! Wires the resolver and token cache into an axum router and owns the
//! listener lifecycle.

use std::future::Future;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ServerError;
use super::routes::{
    cache_status, request_media_token, security_headers, serve_media, supported_extensions,
};
use crate::config::{BrokerConfig, ServerConfig};
use crate::media::{FolderRegistry, PathResolver};
use crate::token::TokenCache;

/// Shared state for request handlers
#[derive(Clone)]
pub struct BrokerState {
    /// Relative path -> media file
    pub resolver: Arc<PathResolver>,
    /// Token store (the only shared mutable state)
    pub tokens: Arc<TokenCache>,
    /// HTTP settings
    pub config: ServerConfig,
}

impl BrokerState {
    pub fn new(resolver: Arc<PathResolver>, tokens: Arc<TokenCache>, config: ServerConfig) -> Self {
        Self {
            resolver,
            tokens,
            config,
        }
    }

    /// Build resolver and cache from service configuration
    pub fn from_config(config: &BrokerConfig) -> Self {
        let registry: Arc<dyn FolderRegistry> = Arc::new(config.folder_registry());
        Self::new(
            Arc::new(PathResolver::new(registry)),
            Arc::new(TokenCache::new(config.token_ttl())),
            config.server.clone(),
        )
    }
}

/// Media preview server
pub struct BrokerServer {
    state: BrokerState,
}

impl BrokerServer {
    pub fn new(state: BrokerState) -> Self {
        Self { state }
    }

    /// Create a server from service configuration
    pub fn with_config(config: &BrokerConfig) -> Self {
        Self::new(BrokerState::from_config(config))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.state.config.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &BrokerState {
        &self.state
    }

    /// Build the router with all routes and middleware
    pub fn build_router(&self) -> Router {
        let state = self.state.clone();
        let endpoint = |part: &str| self.state.config.endpoint(part);

        let router = Router::new()
            .route(&endpoint("supportedExtensions"), get(supported_extensions))
            .route(&endpoint("mediaPath"), post(request_media_token))
            .route(&endpoint("cacheStatus"), get(cache_status))
            .route("/media", get(serve_media))
            .route("/health", get(|| async { "OK" }))
            .layer(middleware::from_fn(security_headers))
            .layer(TraceLayer::new_for_http());

        let origins: Vec<HeaderValue> = self
            .state
            .config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();

        let router = if origins.is_empty() {
            router
        } else {
            router.layer(
                CorsLayer::new()
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers(Any)
                    .allow_origin(origins),
            )
        };

        router.with_state(state)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn start_with_shutdown<F>(&self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self
            .state
            .config
            .socket_addr()
            .map_err(|e| ServerError::BindFailed { reason: e.to_string() })?;
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed { reason: e.to_string() })?;

        tracing::info!(
            "Media preview server listening on {} (api prefix {})",
            addr,
            self.state.config.endpoint("")
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal { reason: e.to_string() })?;

        tracing::info!("Media preview server stopped");
        Ok(())
    }
}
