//! Configuration for the CallShield API service

use std::net::SocketAddr;

/// Default shared-secret key for sandbox and demo deployments.
const DEFAULT_API_KEY: &str = "fraud_detection_api_key_2026";

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Shared-secret API key expected in the X-API-Key header
    pub api_key: String,
    /// Directory holding the model artifact and its sidecar metadata
    pub model_dir: String,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
    /// Emit JSON-formatted logs
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8081".to_string())
                .parse()?,
            api_key: std::env::var("CALLSHIELD_API_KEY")
                .unwrap_or_else(|_| DEFAULT_API_KEY.to_string()),
            model_dir: std::env::var("MODEL_DIR").unwrap_or_else(|_| "models".to_string()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (50 * 1024 * 1024).to_string())
                .parse()?,
            json_logs: std::env::var("JSON_LOGS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    /// Whether the key came from the environment or the built-in default.
    pub fn api_key_source(&self) -> &'static str {
        if std::env::var("CALLSHIELD_API_KEY").is_ok() {
            "environment"
        } else {
            "default"
        }
    }

    /// Get socket address for binding
    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
