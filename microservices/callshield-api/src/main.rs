//! CallShield API Microservice
//!
//! Phone-call fraud scoring service with:
//! - Transcript and audio analysis endpoints (JSON + multipart)
//! - TF-IDF + logistic-regression classification with keyword rule overlay
//! - en/hi/te language detection
//! - On-demand retraining with atomic model swap and JSON persistence
//! - Shared-secret API-key authentication

mod auth;
mod config;
mod error;
mod handlers;
mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use callshield_core::{FraudDetector, ModelStore, SpeechProcessor};

pub use config::Config;
pub use error::{Error, Result};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<FraudDetector>,
    pub speech: SpeechProcessor,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so it can steer log formatting
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    info!("Starting CallShield API microservice");

    let bind_addr = config.bind_address()?;

    // Initialize the detector: load the persisted model or train the default
    let store = ModelStore::new(&config.model_dir);
    let detector = Arc::new(FraudDetector::new(store));
    detector.initialize()?;
    info!(model_dir = %config.model_dir, "fraud detector ready");

    let state = AppState {
        detector,
        speech: SpeechProcessor::new(),
        config: Arc::new(config),
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("CallShield API listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
