//! Server routes and middleware
//!
//! Handlers translate between HTTP and the resolver/cache. They never
//! propagate filesystem errors: misses become an empty token or a 404.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use super::content_type::content_type_for;
use super::error::ApiError;
use super::server::BrokerState;
use crate::media::SupportedExtensions;
use crate::token::RedeemError;

/// Body of a token request
#[derive(Debug, Deserialize)]
pub struct MediaPathRequest {
    /// Path relative to some trusted root; missing means empty
    #[serde(default)]
    pub path: String,
}

/// Token response; both fields empty when nothing can be previewed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTokenResponse {
    pub token: String,
    pub category: String,
}

impl MediaTokenResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Query parameters for media redemption
#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}

/// Cache status (sweeps before counting)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    pub active_tokens: usize,
    pub cleaned_tokens: usize,
}

/// Add security headers to every response
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Prevent MIME type sniffing
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    // Prevent clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    response
}

/// List supported extensions by category
///
/// Route: GET /{author}/{package}/supportedExtensions
pub async fn supported_extensions() -> Json<SupportedExtensions> {
    Json(SupportedExtensions::table())
}

/// Issue a token for the media behind a relative path
///
/// Route: POST /{author}/{package}/mediaPath
pub async fn request_media_token(
    State(state): State<BrokerState>,
    body: Bytes,
) -> Result<Json<MediaTokenResponse>, ApiError> {
    state.tokens.sweep_expired();

    let request: MediaPathRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    let relative = request.path.trim().to_string();
    if relative.is_empty() {
        return Ok(Json(MediaTokenResponse::empty()));
    }

    let resolver = Arc::clone(&state.resolver);
    let lookup = relative.clone();
    let media = tokio::task::spawn_blocking(move || resolver.resolve_media(&lookup))
        .await
        .map_err(ApiError::internal)?;

    match media {
        Ok(media) => {
            let category = media.category;
            let token = state.tokens.mint(media.path, category);
            Ok(Json(MediaTokenResponse {
                token,
                category: category.as_str().to_string(),
            }))
        }
        Err(reason) => {
            if reason.is_io() {
                tracing::warn!("Error processing media path request: {}", reason);
            } else {
                tracing::debug!("No media for {}: {}", relative, reason);
            }
            Ok(Json(MediaTokenResponse::empty()))
        }
    }
}

/// Stream the file behind a token
///
/// Route: GET /media?token=...
pub async fn serve_media(
    State(state): State<BrokerState>,
    Query(params): Query<TokenParams>,
) -> Response {
    match open_media(&state, params.token.as_deref().unwrap_or("")).await {
        Ok(response) => response,
        Err(err) => err.into_plain_response(),
    }
}

async fn open_media(state: &BrokerState, token: &str) -> Result<Response, ApiError> {
    let token = token.trim().to_string();
    let tokens = Arc::clone(&state.tokens);
    let redemption = tokio::task::spawn_blocking(move || tokens.redeem(&token))
        .await
        .map_err(ApiError::internal)??;

    let file = match tokio::fs::File::open(&redemption.path).await {
        Ok(file) => file,
        // Deleted between the existence check and open
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RedeemError::FileVanished {
                path: redemption.path.display().to_string(),
            }
            .into());
        }
        Err(e) => {
            return Err(ApiError::internal(format!(
                "Error opening media file {}: {}",
                redemption.path.display(),
                e
            )));
        }
    };

    let content_type = content_type_for(&redemption.path, Some(redemption.category));
    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CACHE_CONTROL, "private, max-age=3600"),
    ];

    Ok((
        StatusCode::OK,
        headers,
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

/// Report live tokens after sweeping expired ones
///
/// Route: GET /{author}/{package}/cacheStatus
pub async fn cache_status(State(state): State<BrokerState>) -> Json<CacheStatus> {
    let cleaned_tokens = state.tokens.sweep_expired();
    Json(CacheStatus {
        active_tokens: state.tokens.len(),
        cleaned_tokens,
    })
}
