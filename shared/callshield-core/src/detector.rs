//! Fraud detection engine
//!
//! Composes the pipeline: normalize -> detect language -> classify ->
//! extract features -> keyword rule overlay -> aggregate into one
//! `AnalysisResult` with ranked explanations.
//!
//! The trained model is process-wide state: every scoring call takes an
//! `Arc` snapshot at call start, and retrains replace the slot wholesale,
//! so in-flight requests always see one consistent model.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::category::Category;
use crate::classifier::{ClassificationResult, ModelMetadata, TrainedModel};
use crate::error::{CoreError, Result};
use crate::features::{extract_features, FeatureVector};
use crate::language::{detect_language, Language};
use crate::rules::{analyze_keywords, RuleLabel};
use crate::trainer::{ModelStore, Trainer, TrainingExample, TrainingReport};
use crate::MODEL_VERSION;

/// Risk level thresholds on the 0-100 risk score.
const HIGH_RISK_THRESHOLD: u8 = 80;
const MEDIUM_RISK_THRESHOLD: u8 = 60;
const LOW_RISK_THRESHOLD: u8 = 30;

/// Fixed lenient result for empty or unusable input.
const FALLBACK_RISK_SCORE: u8 = 5;
const FALLBACK_CONFIDENCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> RiskLevel {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else if score >= LOW_RISK_THRESHOLD {
            RiskLevel::Low
        } else {
            RiskLevel::VeryLow
        }
    }
}

/// The externally visible analysis artifact, serialized directly as the
/// response body. Constructed once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub is_fraud: bool,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub predicted_category: Category,
    pub confidence: f64,
    pub language_detected: Language,
    pub explanations: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub audio_processed: bool,
    pub transcript: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub model_version: String,
}

/// Shared fraud detector holding the swappable trained model.
pub struct FraudDetector {
    model: RwLock<Option<Arc<TrainedModel>>>,
    store: ModelStore,
}

impl FraudDetector {
    pub fn new(store: ModelStore) -> FraudDetector {
        FraudDetector {
            model: RwLock::new(None),
            store,
        }
    }

    /// Load the persisted model, or train and persist the default model
    /// when none exists. Must run before the first scoring call.
    pub fn initialize(&self) -> Result<()> {
        match self.store.load() {
            Ok(model) => {
                self.install(model);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "could not load existing model, training default");
                let (model, _) = Trainer::train(None)?;
                self.store.save(&model)?;
                self.install(model);
                Ok(())
            }
        }
    }

    /// Replace the live model wholesale. In-flight scoring calls keep the
    /// snapshot they already took.
    pub fn install(&self, model: TrainedModel) {
        *self.model.write() = Some(Arc::new(model));
        info!("model installed");
    }

    /// Train on the supplied dataset (or the default), persist, and swap
    /// the live model.
    pub fn retrain(&self, dataset: Option<&[TrainingExample]>) -> Result<TrainingReport> {
        let (model, report) = Trainer::train(dataset)?;
        self.store.save(&model)?;
        self.install(model);
        Ok(report)
    }

    /// Snapshot of the active model reference.
    fn snapshot(&self) -> Result<Arc<TrainedModel>> {
        self.model.read().clone().ok_or(CoreError::ModelNotLoaded)
    }

    /// Metadata of the active model (falls back to the sidecar on disk).
    pub fn model_info(&self) -> Result<ModelMetadata> {
        if let Some(model) = self.model.read().as_ref() {
            return Ok(model.metadata.clone());
        }
        self.store.load_info()
    }

    /// Score a transcript. `audio_processed` marks results recovered from
    /// audio input. Input errors never surface: blank input yields the
    /// fixed lenient fallback result.
    pub fn analyze(&self, transcript: &str, audio_processed: bool) -> Result<AnalysisResult> {
        if transcript.trim().is_empty() {
            return Ok(Self::fallback_result(audio_processed));
        }

        let model = self.snapshot()?;

        let language = detect_language(transcript);
        let classification = model.predict(transcript);
        let features = extract_features(transcript);
        let rules = analyze_keywords(transcript);
        debug!(top_features = ?features.important_features(), "feature signals");

        // Rule overlay: authoritative upward only. Rules can raise the
        // score and force the fraud verdict, never lower either. The level
        // always derives from the final score so the two stay consistent.
        let risk_score = classification.risk_score().max(rules.score);
        let risk_level = RiskLevel::from_score(risk_score);
        let is_fraud = classification.is_fraud() || rules.label.forces_fraud();

        let explanations = generate_explanations(&features, &classification);

        Ok(AnalysisResult {
            is_fraud,
            risk_score,
            risk_level,
            predicted_category: classification.predicted_category,
            confidence: classification.confidence(),
            language_detected: language,
            explanations,
            matched_keywords: rules.matched_keywords,
            audio_processed,
            transcript: transcript.to_string(),
            analysis_timestamp: Utc::now(),
            model_version: MODEL_VERSION.to_string(),
        })
    }

    fn fallback_result(audio_processed: bool) -> AnalysisResult {
        AnalysisResult {
            is_fraud: false,
            risk_score: FALLBACK_RISK_SCORE,
            risk_level: RiskLevel::VeryLow,
            predicted_category: Category::Legitimate,
            confidence: FALLBACK_CONFIDENCE,
            language_detected: Language::En,
            explanations: vec![
                "No usable transcript was provided; returning the low-risk default".to_string(),
            ],
            matched_keywords: Vec::new(),
            audio_processed,
            transcript: String::new(),
            analysis_timestamp: Utc::now(),
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

/// Rule-ordered, additive explanation lines: one per nonzero feature
/// signal in fixed order, then exactly one confidence-tier line.
fn generate_explanations(
    features: &FeatureVector,
    classification: &ClassificationResult,
) -> Vec<String> {
    let mut explanations = Vec::new();

    if features.urgency_words > 0 {
        explanations.push(format!(
            "Contains {} urgency indicators",
            features.urgency_words
        ));
    }
    if features.money_mentions > 0 {
        explanations.push(format!(
            "Contains {} financial references",
            features.money_mentions
        ));
    }
    if features.personal_info_requests > 0 {
        explanations.push("Requests personal information".to_string());
    }
    if features.phone_numbers > 0 {
        explanations.push("Contains phone numbers".to_string());
    }
    if features.suspicious_phrases > 0 {
        explanations.push(format!(
            "Contains {} suspicious phrases",
            features.suspicious_phrases
        ));
    }
    if features.emotional_manipulation > 0 {
        explanations.push("Uses emotional manipulation tactics".to_string());
    }
    if features.authority_claims > 0 {
        explanations.push("Claims authority or official status".to_string());
    }

    let confidence = classification.confidence();
    if confidence > 0.8 {
        explanations.push("High confidence prediction based on learned patterns".to_string());
    } else if confidence > 0.6 {
        explanations.push("Moderate confidence prediction".to_string());
    } else {
        explanations.push("Low confidence prediction - manual review recommended".to_string());
    }

    explanations
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    // Training the default model is the slow part; share one across tests.
    static DETECTOR: Lazy<FraudDetector> = Lazy::new(|| {
        let detector = FraudDetector::new(ModelStore::new("target/test-models-unused"));
        let (model, _) = Trainer::train(None).expect("default training succeeds");
        detector.install(model);
        detector
    });

    #[test]
    fn test_analyze_before_initialize_fails() {
        let detector = FraudDetector::new(ModelStore::new("target/never-created"));
        let err = detector.analyze("hello there", false).unwrap_err();
        assert!(matches!(err, CoreError::ModelNotLoaded));
    }

    #[test]
    fn test_empty_input_fallback_contract() {
        let detector = FraudDetector::new(ModelStore::new("target/never-created"));
        // The fallback path does not need a model.
        let result = detector.analyze("   ", false).unwrap();
        assert!(!result.is_fraud);
        assert_eq!(result.risk_score, 5);
        assert_eq!(result.risk_level, RiskLevel::VeryLow);
        assert_eq!(result.predicted_category, Category::Legitimate);
        assert!((result.confidence - 0.05).abs() < f64::EPSILON);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_risk_level_threshold_mapping() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(79), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn test_irs_scam_scenario() {
        let result = DETECTOR
            .analyze(
                "This is the IRS. You owe $5,000 in back taxes. Pay now or face arrest.",
                false,
            )
            .unwrap();

        assert!(result.is_fraud);
        assert!(result.predicted_category.is_fraud());
        assert!(result.risk_score >= 60, "risk_score was {}", result.risk_score);
        assert!(result
            .explanations
            .iter()
            .any(|e| e.contains("urgency indicators")));
        assert!(result
            .explanations
            .iter()
            .any(|e| e.contains("authority")));
    }

    #[test]
    fn test_legitimate_appointment_scenario() {
        let result = DETECTOR
            .analyze(
                "Hello, this is Dr. Smith's office confirming your appointment tomorrow at 2 PM.",
                false,
            )
            .unwrap();

        assert!(!result.is_fraud);
        assert_eq!(result.predicted_category, Category::Legitimate);
        assert!(matches!(
            result.risk_level,
            RiskLevel::VeryLow | RiskLevel::Low
        ));
    }

    #[test]
    fn test_rule_label_forces_fraud_verdict() {
        // Heavy keyword text: the rule engine alone must force is_fraud.
        let result = DETECTOR
            .analyze(
                "Your bank account blocked. Share OTP 123456 immediately to verify, urgent!",
                false,
            )
            .unwrap();
        assert!(result.is_fraud);
        assert!(result.risk_score >= 75);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.matched_keywords.contains(&"otp".to_string()));
    }

    #[test]
    fn test_risk_level_consistent_with_score() {
        for text in [
            "Hello, confirming your restaurant reservation for tonight.",
            "Your bank account blocked. Share OTP immediately, urgent!",
            "You won a lottery prize! Pay the processing fee now.",
        ] {
            let result = DETECTOR.analyze(text, false).unwrap();
            let expected = match result.risk_score {
                80..=100 => RiskLevel::High,
                60..=79 => RiskLevel::Medium,
                30..=59 => RiskLevel::Low,
                _ => RiskLevel::VeryLow,
            };
            assert_eq!(result.risk_level, expected, "text: {text}");
        }
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let text = "Congratulations! You won a lottery. Share your bank details to claim.";
        let a = DETECTOR.analyze(text, false).unwrap();
        let b = DETECTOR.analyze(text, false).unwrap();

        assert_eq!(a.is_fraud, b.is_fraud);
        assert_eq!(a.risk_score, b.risk_score);
        assert_eq!(a.risk_level, b.risk_level);
        assert_eq!(a.predicted_category, b.predicted_category);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.explanations, b.explanations);
        assert_eq!(a.matched_keywords, b.matched_keywords);
    }

    #[test]
    fn test_retrain_swaps_model_wholesale() {
        let detector = FraudDetector::new(ModelStore::new(std::env::temp_dir().join(format!(
            "callshield-retrain-{}",
            std::process::id()
        ))));
        let (model, _) = Trainer::train(None).unwrap();
        detector.install(model);

        // A dataset that flips a benign-sounding phrase into a fraud class.
        let dataset = vec![
            TrainingExample {
                text: "the quarterly garden newsletter arrived".to_string(),
                category: "phishing".to_string(),
            },
            TrainingExample {
                text: "share your otp now".to_string(),
                category: "financial".to_string(),
            },
            TrainingExample {
                text: "doctor appointment tomorrow".to_string(),
                category: "legitimate".to_string(),
            },
        ];
        let (new_model, _) = Trainer::train(Some(&dataset)).unwrap();
        detector.install(new_model);

        let result = detector
            .analyze("the quarterly garden newsletter arrived", false)
            .unwrap();
        assert_eq!(result.predicted_category, Category::Phishing);
    }

    #[test]
    fn test_exactly_one_confidence_line() {
        let result = DETECTOR.analyze("Share your OTP now, urgent!", false).unwrap();
        let confidence_lines = result
            .explanations
            .iter()
            .filter(|e| e.contains("confidence"))
            .count();
        assert_eq!(confidence_lines, 1);
    }
}
