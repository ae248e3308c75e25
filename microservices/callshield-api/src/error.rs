//! Error types for the CallShield API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use callshield_core::CoreError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// API error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Empty API key")]
    EmptyApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Model not ready")]
    ModelNotReady,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ModelNotLoaded => Error::ModelNotReady,
            CoreError::Training(msg) => Error::Training(msg),
            CoreError::Persistence(msg) => Error::Internal(msg),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::MissingApiKey | Error::EmptyApiKey => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::InvalidApiKey => (StatusCode::FORBIDDEN, self.to_string()),
            Error::InvalidRequest(_) | Error::Training(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::ModelNotReady => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Error::Internal(_) => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        use axum::response::IntoResponse;

        assert_eq!(
            Error::MissingApiKey.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::InvalidApiKey.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Training("empty".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::ModelNotReady.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_core_error_conversion() {
        let err: Error = CoreError::ModelNotLoaded.into();
        assert!(matches!(err, Error::ModelNotReady));
    }
}
