//! Route definitions for the CallShield API

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::auth::require_api_key;
use crate::handlers;
use crate::AppState;

/// Build the application router. The health endpoint stays outside the
/// API-key layer; everything else under `/api/v1` requires the key.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/auth/info", get(handlers::auth_info))
        .route("/api/v1/analyze-text", post(handlers::analyze_text))
        .route("/api/v1/analyze-audio", post(handlers::analyze_audio))
        .route("/api/v1/train", post(handlers::train))
        .route("/api/v1/model-info", get(handlers::model_info))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}
