//! Error types for the scoring pipeline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Classification requested before a model was trained or loaded.
    #[error("model not loaded - train or load a model before classifying")]
    ModelNotLoaded,

    #[error("training error: {0}")]
    Training(String),

    #[error("model persistence error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}
