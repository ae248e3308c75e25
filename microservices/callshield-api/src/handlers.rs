//! HTTP request handlers
//!
//! Handlers stay thin: decode the request leniently, call into the core
//! pipeline, and serialize the result. Pipeline input problems never become
//! HTTP errors; the core's lenient fallback result carries them instead.

use axum::extract::{Multipart, State};
use axum::Json;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use callshield_core::{AnalysisResult, ModelMetadata, TrainingExample};

use crate::auth::{api_key_format_is_valid, API_KEY_HEADER};
use crate::error::{Error, Result};
use crate::AppState;

/// Analyze-text request. Callers send either a transcript or base64 audio;
/// several alias spellings of the audio field are accepted.
#[derive(Debug, Deserialize, Default)]
pub struct AnalyzeTextRequest {
    pub text: Option<String>,
    #[serde(alias = "audioBase64", alias = "audio", alias = "base64_audio")]
    pub audio_base64: Option<String>,
    // Accepted and ignored: language is detected, format is sniffed.
    #[allow(dead_code)]
    pub language: Option<String>,
    #[allow(dead_code)]
    pub audio_format: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TrainRequest {
    pub training_data: Option<Vec<TrainingExample>>,
}

/// `GET /api/v1/health` - liveness plus auth bootstrap info, no key needed.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let model_loaded = state.detector.model_info().is_ok();
    Json(json!({
        "status": "healthy",
        "service": "callshield-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
        "components": {
            "fraud_detector": if model_loaded { "ready" } else { "loading" },
            "speech_processor": "ready"
        },
        "authentication": {
            "required": true,
            "header": API_KEY_HEADER,
            "demo_key": state.config.api_key,
            "key_source": state.config.api_key_source()
        }
    }))
}

/// `GET /api/v1/auth/info` - echo of the authentication configuration.
pub async fn auth_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "authentication_required": true,
        "header": API_KEY_HEADER,
        "expected_key": state.config.api_key,
        "key_source": state.config.api_key_source(),
        "key_format_valid": api_key_format_is_valid(&state.config.api_key)
    }))
}

/// `POST /api/v1/analyze-text` - score a transcript or inline base64 audio.
///
/// Missing body, missing fields, and undecodable audio all degrade to the
/// core's lenient fallback result instead of a 4xx.
pub async fn analyze_text(
    State(state): State<AppState>,
    body: Option<Json<AnalyzeTextRequest>>,
) -> Result<Json<AnalysisResult>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    if let Some(text) = request.text.as_deref().filter(|t| !t.trim().is_empty()) {
        let result = state.detector.analyze(text, false)?;
        info!(
            risk_score = result.risk_score,
            is_fraud = result.is_fraud,
            "text analyzed"
        );
        return Ok(Json(result));
    }

    if let Some(encoded) = request
        .audio_base64
        .as_deref()
        .filter(|a| !a.trim().is_empty())
    {
        let result = match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
            Ok(bytes) => {
                let transcript = state.speech.transcribe(&bytes);
                state.detector.analyze(&transcript, true)?
            }
            Err(err) => {
                warn!(%err, "base64 audio payload did not decode");
                state.detector.analyze("", true)?
            }
        };
        info!(
            risk_score = result.risk_score,
            is_fraud = result.is_fraud,
            "inline audio analyzed"
        );
        return Ok(Json(result));
    }

    Ok(Json(state.detector.analyze("", false)?))
}

/// `POST /api/v1/analyze-audio` - multipart audio upload under field `audio`.
pub async fn analyze_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::InvalidRequest(format!("Malformed multipart body: {err}")))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        if !callshield_core::speech::is_allowed_audio_filename(&filename) {
            return Err(Error::InvalidRequest(
                "Invalid audio file format".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|err| Error::InvalidRequest(format!("Could not read audio field: {err}")))?;

        let transcript = state.speech.transcribe(&bytes);
        let result = state.detector.analyze(&transcript, true)?;
        info!(
            file = %filename,
            bytes = bytes.len(),
            risk_score = result.risk_score,
            "audio upload analyzed"
        );
        return Ok(Json(result));
    }

    Err(Error::InvalidRequest("No audio file provided".to_string()))
}

/// `POST /api/v1/train` - retrain on the supplied dataset (or the default),
/// persist the artifact, and swap the live model.
pub async fn train(
    State(state): State<AppState>,
    body: Option<Json<TrainRequest>>,
) -> Result<Json<Value>> {
    let dataset = body.and_then(|Json(r)| r.training_data);

    // Training runs full-batch gradient descent; keep it off the runtime.
    let detector = state.detector.clone();
    let report = tokio::task::spawn_blocking(move || detector.retrain(dataset.as_deref()))
        .await
        .map_err(|err| Error::Internal(format!("training task failed: {err}")))??;

    info!(
        samples = report.training_samples,
        accuracy = report.accuracy,
        "model retrained and swapped"
    );

    Ok(Json(json!({
        "status": "success",
        "message": "Model trained successfully",
        "training_samples": report.training_samples,
        "accuracy": report.accuracy,
        "timestamp": report.timestamp
    })))
}

/// `GET /api/v1/model-info` - metadata of the active model.
pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelMetadata>> {
    Ok(Json(state.detector.model_info()?))
}
