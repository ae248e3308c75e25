//! CallShield Core - Phone-call fraud scoring pipeline
//!
//! This crate provides:
//! - Transcript normalization and en/hi/te language detection
//! - Regex-family feature extraction with composite risk scores
//! - Weighted multilingual keyword rule engine
//! - TF-IDF + multinomial logistic regression classifier and trainer
//! - Score aggregation and explanation generation
//! - Speech-to-text collaborator boundary with safe fallback

pub mod category;
pub mod classifier;
pub mod detector;
pub mod error;
pub mod features;
pub mod language;
pub mod normalize;
pub mod rules;
pub mod speech;
pub mod trainer;

pub use category::Category;
pub use classifier::{ClassificationResult, ModelMetadata, TrainedModel};
pub use detector::{AnalysisResult, FraudDetector, RiskLevel};
pub use error::{CoreError, Result};
pub use features::FeatureVector;
pub use language::Language;
pub use rules::{RuleLabel, RuleResult};
pub use speech::SpeechProcessor;
pub use trainer::{ModelStore, Trainer, TrainingExample, TrainingReport};

/// Version stamped into analysis results and model metadata.
pub const MODEL_VERSION: &str = "1.0.0";
