//! Model training and persistence
//!
//! Fits the TF-IDF + logistic-regression pipeline on a labeled dataset (or
//! the built-in default multilingual dataset) and persists the result as a
//! JSON artifact plus a sidecar metadata record.
//!
//! The trainer fits on the entire dataset - there is no held-out split, so
//! the reported accuracy is training accuracy. That is the documented
//! contract, kept from the original offline-safe design for small datasets;
//! it must not be read as a generalization estimate.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::category::Category;
use crate::classifier::{ModelMetadata, SoftmaxClassifier, TfidfVectorizer, TrainedModel};
use crate::error::{CoreError, Result};
use crate::normalize::normalize_text;
use crate::MODEL_VERSION;

const ALGORITHM: &str = "TF-IDF + Logistic Regression";

/// One labeled training example. The category is a free string on the wire;
/// unknown labels coerce to `legitimate` when the dataset is prepared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    #[serde(default)]
    pub category: String,
}

impl TrainingExample {
    fn new(text: &str, category: &str) -> TrainingExample {
        TrainingExample {
            text: text.to_string(),
            category: category.to_string(),
        }
    }
}

/// Outcome of a successful training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub training_samples: usize,
    pub accuracy: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Trains the classifier pipeline.
pub struct Trainer;

impl Trainer {
    /// Fit the pipeline on the given dataset, or on the default dataset
    /// when `None`. Fails on an empty dataset.
    pub fn train(dataset: Option<&[TrainingExample]>) -> Result<(TrainedModel, TrainingReport)> {
        let default_data;
        let data = match dataset {
            Some(data) if !data.is_empty() => data,
            Some(_) => return Err(CoreError::Training("training dataset is empty".to_string())),
            None => {
                default_data = default_training_data();
                &default_data
            }
        };

        let mut documents = Vec::with_capacity(data.len());
        let mut labels = Vec::with_capacity(data.len());
        for example in data {
            documents.push(normalize_text(&example.text));
            labels.push(Category::parse_lenient(&example.category).index());
        }

        let vectorizer = TfidfVectorizer::fit(&documents);
        let rows: Vec<Vec<f64>> = documents.iter().map(|d| vectorizer.transform(d)).collect();
        let classifier = SoftmaxClassifier::fit(&rows, &labels);

        // Training accuracy on the full fit set (not a generalization metric).
        let correct = rows
            .iter()
            .zip(&labels)
            .filter(|(row, &label)| {
                let probs = classifier.predict_proba(row);
                let argmax = probs
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                argmax == label
            })
            .count();
        let accuracy = correct as f64 / labels.len() as f64;

        let now = Utc::now();
        let metadata = ModelMetadata {
            created_at: now,
            version: MODEL_VERSION.to_string(),
            algorithm: ALGORITHM.to_string(),
            training_samples: labels.len(),
            accuracy,
            categories: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        };

        info!(
            samples = labels.len(),
            accuracy, "model trained on full dataset"
        );

        let report = TrainingReport {
            training_samples: labels.len(),
            accuracy,
            timestamp: now,
        };

        Ok((
            TrainedModel {
                vectorizer,
                classifier,
                metadata,
            },
            report,
        ))
    }
}

/// Built-in default multilingual dataset spanning all seven categories:
/// the original short seed phrases plus full-sentence call transcripts so
/// the out-of-box model sees realistic phrasing.
pub fn default_training_data() -> Vec<TrainingExample> {
    vec![
        // Tech support
        TrainingExample::new(
            "This is Microsoft support. Your computer is infected. Share card details.",
            "tech_support",
        ),
        TrainingExample::new(
            "Apple security calling. Verify your password immediately.",
            "tech_support",
        ),
        TrainingExample::new(
            "Hello, this is Microsoft technical support. We have detected suspicious activity on \
             your computer. Please provide your credit card information to verify your identity \
             and we will fix the problem immediately.",
            "tech_support",
        ),
        // Financial
        TrainingExample::new("Your bank account will be blocked. Share OTP now.", "financial"),
        TrainingExample::new("Credit card suspended. Confirm CVV immediately.", "financial"),
        TrainingExample::new(
            "This is your bank calling. There has been fraudulent activity on your account. \
             Please confirm your social security number and PIN to secure your account.",
            "financial",
        ),
        // Romance
        TrainingExample::new("I love you but I need money to come meet you.", "romance"),
        TrainingExample::new("Please send funds for visa fees.", "romance"),
        // Lottery
        TrainingExample::new(
            "You won a lottery. Pay processing fee to receive prize.",
            "lottery_prize",
        ),
        TrainingExample::new("Congratulations! Claim your reward today.", "lottery_prize"),
        TrainingExample::new(
            "Congratulations! You have won $50,000 in our lottery. To claim your prize, please \
             provide your bank account details and pay a small processing fee of $500.",
            "lottery_prize",
        ),
        // Phishing
        TrainingExample::new(
            "Your PayPal account will be suspended. Click the link now.",
            "phishing",
        ),
        TrainingExample::new("Amazon security alert. Verify your account.", "phishing"),
        // Robocall
        TrainingExample::new("IRS notice. Pay tax immediately or face arrest.", "robocall"),
        TrainingExample::new("Car warranty expiring. Press 1 now.", "robocall"),
        TrainingExample::new(
            "Hi, I'm calling from the IRS. You owe back taxes and if you don't pay immediately, \
             we will issue a warrant for your arrest. Please provide your credit card \
             information now.",
            "robocall",
        ),
        TrainingExample::new(
            "Hello, I'm calling about your car warranty that is about to expire. We need your \
             personal information to extend the warranty. This is a limited time offer.",
            "robocall",
        ),
        // Legitimate
        TrainingExample::new("Doctor appointment reminder tomorrow at 2 PM.", "legitimate"),
        TrainingExample::new("Calling to confirm your restaurant reservation.", "legitimate"),
        TrainingExample::new("Your pharmacy prescription is ready.", "legitimate"),
        TrainingExample::new(
            "Hello, this is Dr. Smith's office calling to confirm your appointment tomorrow at \
             2 PM. Please call us back if you need to reschedule.",
            "legitimate",
        ),
        TrainingExample::new(
            "This is a reminder that your library books are due tomorrow. You can renew them \
             online or by calling the library.",
            "legitimate",
        ),
        // Hindi
        TrainingExample::new("आपका बैंक खाता बंद होने वाला है, तुरंत ओटीपी बताएं।", "financial"),
        TrainingExample::new("आपका डॉक्टर अपॉइंटमेंट कल है।", "legitimate"),
        // Telugu
        TrainingExample::new("మీ బ్యాంక్ ఖాతా బ్లాక్ అవుతుంది. వెంటనే ఓటీపీ చెప్పండి.", "financial"),
        TrainingExample::new("మీ డాక్టర్ అపాయింట్మెంట్ రేపు ఉంది.", "legitimate"),
    ]
}

/// On-disk model persistence: one serialized pipeline artifact plus a
/// sidecar metadata record.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> ModelStore {
        ModelStore { dir: dir.into() }
    }

    fn model_path(&self) -> PathBuf {
        self.dir.join("fraud_model.json")
    }

    fn info_path(&self) -> PathBuf {
        self.dir.join("model_info.json")
    }

    pub fn exists(&self) -> bool {
        self.model_path().exists()
    }

    pub fn save(&self, model: &TrainedModel) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        write_json(&self.model_path(), model)?;
        write_json(&self.info_path(), &model.metadata)?;
        info!(path = %self.model_path().display(), "model saved");
        Ok(())
    }

    pub fn load(&self) -> Result<TrainedModel> {
        let bytes = fs::read(self.model_path())?;
        let model = serde_json::from_slice(&bytes)?;
        info!(path = %self.model_path().display(), "model loaded");
        Ok(model)
    }

    pub fn load_info(&self) -> Result<ModelMetadata> {
        let bytes = fs::read(self.info_path())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
