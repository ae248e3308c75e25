//! API-key authentication middleware
//!
//! Single shared secret in the `X-API-Key` header: missing or blank keys
//! get 401, a wrong key gets 403. The health endpoint is mounted outside
//! this layer.

use axum::{extract::Request, extract::State, middleware::Next, response::Response};

use crate::error::{Error, Result};
use crate::AppState;

/// Header carrying the shared-secret API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::MissingApiKey)?;

    if provided.trim().is_empty() {
        return Err(Error::EmptyApiKey);
    }
    if provided != state.config.api_key {
        return Err(Error::InvalidApiKey);
    }

    Ok(next.run(request).await)
}

/// Basic shape check used by the auth-info endpoint: at least 10 chars of
/// alphanumerics, underscores or hyphens.
pub fn api_key_format_is_valid(api_key: &str) -> bool {
    api_key.len() >= 10 && api_key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
