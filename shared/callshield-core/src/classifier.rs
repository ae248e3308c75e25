//! ML classifier
//!
//! Term-frequency TF-IDF vectorizer (unigrams + bigrams, stopword-filtered,
//! bounded vocabulary) feeding a multinomial logistic-regression classifier
//! over the seven call categories. Training is deterministic full-batch
//! gradient descent with class-balanced sample weights; there is no RNG
//! anywhere in the pipeline, so repeated fits on the same data produce the
//! same model.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::normalize::normalize_text;

/// Tokens are word characters, two or more (the sklearn default pattern the
/// original pipeline relied on).
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// English stopwords filtered before n-gram construction.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as",
        "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
        "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
        "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
        "how", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no",
        "nor", "not", "of", "off", "on", "once", "only", "or", "other", "our", "out", "over",
        "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
        "them", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
        "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
        "who", "whom", "why", "will", "with", "you", "your", "yours",
    ]
    .into_iter()
    .collect()
});

const MAX_FEATURES: usize = 5000;
const MAX_DF: f64 = 0.95;

/// Gradient-descent schedule. Fixed constants keep training deterministic.
const EPOCHS: usize = 1500;
const LEARNING_RATE: f64 = 1.0;

/// Unigrams + bigrams of stopword-filtered tokens.
fn ngrams(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| !STOPWORDS.contains(t))
        .collect();

    let mut grams: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    for pair in tokens.windows(2) {
        grams.push(format!("{} {}", pair[0], pair[1]));
    }
    grams
}

/// Fitted TF-IDF vectorizer. The vocabulary maps terms to column indices;
/// `BTreeMap` keeps iteration and serialization order deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit on normalized documents: document-frequency counting, max-df
    /// pruning, vocabulary capped at `MAX_FEATURES` (highest df first, ties
    /// lexicographic), smoothed IDF.
    pub fn fit(documents: &[String]) -> TfidfVectorizer {
        let n_docs = documents.len();
        let mut df: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let unique: HashSet<String> = ngrams(doc).into_iter().collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let max_df_count = (MAX_DF * n_docs as f64).floor() as usize;
        let mut candidates: Vec<(String, usize)> = df
            .into_iter()
            .filter(|(_, count)| n_docs <= 1 || *count <= max_df_count.max(1))
            .collect();

        // Highest document frequency first, lexicographic on ties, so the
        // vocabulary cap is reproducible.
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates.truncate(MAX_FEATURES);

        let mut terms: Vec<(String, usize)> = candidates;
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(terms.len());
        for (col, (term, count)) in terms.into_iter().enumerate() {
            vocabulary.insert(term, col);
            idf.push(((1.0 + n_docs as f64) / (1.0 + count as f64)).ln() + 1.0);
        }

        TfidfVectorizer { vocabulary, idf }
    }

    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Transform one normalized document into an L2-normalized TF-IDF row.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.idf.len()];
        for term in ngrams(document) {
            if let Some(&col) = self.vocabulary.get(&term) {
                row[col] += 1.0;
            }
        }

        for (col, value) in row.iter_mut().enumerate() {
            *value *= self.idf[col];
        }

        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in row.iter_mut() {
                *value /= norm;
            }
        }
        row
    }
}

/// Multinomial logistic-regression weights: one row per category, bias in
/// the last column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxClassifier {
    weights: Vec<Vec<f64>>,
}

impl SoftmaxClassifier {
    /// Fit with class-balanced sample weights: each present class
    /// contributes equal total weight, so the small `legitimate` slice is
    /// not drowned out by the six fraud classes.
    pub fn fit(rows: &[Vec<f64>], labels: &[usize]) -> SoftmaxClassifier {
        let dim = rows.first().map(|r| r.len()).unwrap_or(0);
        let n = rows.len();

        let mut class_counts = [0usize; Category::COUNT];
        for &label in labels {
            class_counts[label] += 1;
        }
        let present = class_counts.iter().filter(|&&c| c > 0).count().max(1);
        let sample_weight = |label: usize| -> f64 {
            n as f64 / (present as f64 * class_counts[label] as f64)
        };

        let mut weights = vec![vec![0.0; dim + 1]; Category::COUNT];

        for _ in 0..EPOCHS {
            let mut grads = vec![vec![0.0; dim + 1]; Category::COUNT];

            for (row, &label) in rows.iter().zip(labels) {
                let probs = Self::softmax_for(&weights, row);
                let sw = sample_weight(label);
                for (class, grad) in grads.iter_mut().enumerate() {
                    let err = sw * (probs[class] - if class == label { 1.0 } else { 0.0 });
                    for (col, &x) in row.iter().enumerate() {
                        grad[col] += err * x;
                    }
                    grad[dim] += err;
                }
            }

            for (weight_row, grad_row) in weights.iter_mut().zip(&grads) {
                for (w, g) in weight_row.iter_mut().zip(grad_row) {
                    *w -= LEARNING_RATE * g / n as f64;
                }
            }
        }

        SoftmaxClassifier { weights }
    }

    fn softmax_for(weights: &[Vec<f64>], row: &[f64]) -> [f64; Category::COUNT] {
        let dim = row.len();
        let mut logits = [0.0; Category::COUNT];
        for (class, weight_row) in weights.iter().enumerate() {
            let mut z = weight_row[dim];
            for (col, &x) in row.iter().enumerate() {
                z += weight_row[col] * x;
            }
            logits[class] = z;
        }

        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut probs = [0.0; Category::COUNT];
        let mut sum = 0.0;
        for (p, &z) in probs.iter_mut().zip(&logits) {
            *p = (z - max).exp();
            sum += *p;
        }
        for p in probs.iter_mut() {
            *p /= sum;
        }
        probs
    }

    pub fn predict_proba(&self, row: &[f64]) -> [f64; Category::COUNT] {
        Self::softmax_for(&self.weights, row)
    }
}

/// Probability distribution over the seven categories for one transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub probabilities: [f64; Category::COUNT],
    pub predicted_category: Category,
}

impl ClassificationResult {
    /// Highest probability over all seven categories.
    pub fn confidence(&self) -> f64 {
        self.probabilities.iter().cloned().fold(0.0, f64::max)
    }

    /// Risk score 0-100: highest probability over the six fraud categories.
    pub fn risk_score(&self) -> u8 {
        let fraud_max = Category::ALL
            .iter()
            .filter(|c| c.is_fraud())
            .map(|c| self.probabilities[c.index()])
            .fold(0.0, f64::max);
        (fraud_max * 100.0).round() as u8
    }

    pub fn is_fraud(&self) -> bool {
        self.predicted_category.is_fraud()
    }

    /// Category -> probability pairs in label order.
    pub fn by_category(&self) -> Vec<(Category, f64)> {
        Category::ALL
            .iter()
            .map(|&c| (c, self.probabilities[c.index()]))
            .collect()
    }
}

/// Metadata persisted next to the model artifact. The reported accuracy is
/// training-set accuracy (the trainer fits on the full dataset with no
/// held-out split); it is not a generalization estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub algorithm: String,
    pub training_samples: usize,
    pub accuracy: f64,
    pub categories: Vec<String>,
}

/// Fitted vectorizer + classifier pipeline. Read-only after training;
/// retrains replace the whole value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub vectorizer: TfidfVectorizer,
    pub classifier: SoftmaxClassifier,
    pub metadata: ModelMetadata,
}

impl TrainedModel {
    /// Classify a raw transcript: normalize, vectorize, softmax.
    pub fn predict(&self, text: &str) -> ClassificationResult {
        let normalized = normalize_text(text);
        let row = self.vectorizer.transform(&normalized);
        let probabilities = self.classifier.predict_proba(&row);

        let predicted = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(Category::Legitimate.index());

        ClassificationResult {
            probabilities,
            predicted_category: Category::from_index(predicted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_corpus() -> (Vec<String>, Vec<usize>) {
        let docs = vec![
            "share your otp and bank account details".to_string(),
            "your bank account is blocked share otp".to_string(),
            "doctor appointment reminder tomorrow".to_string(),
            "pharmacy prescription ready for pickup".to_string(),
        ];
        let labels = vec![
            Category::Financial.index(),
            Category::Financial.index(),
            Category::Legitimate.index(),
            Category::Legitimate.index(),
        ];
        (docs, labels)
    }

    #[test]
    fn test_vectorizer_vocabulary_is_deterministic() {
        let (docs, _) = tiny_corpus();
        let a = TfidfVectorizer::fit(&docs);
        let b = TfidfVectorizer::fit(&docs);
        assert_eq!(a.vocabulary, b.vocabulary);
        assert_eq!(a.idf, b.idf);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let (docs, _) = tiny_corpus();
        let vectorizer = TfidfVectorizer::fit(&docs);
        let row = vectorizer.transform(&docs[0]);
        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_terms_produce_zero_row() {
        let (docs, _) = tiny_corpus();
        let vectorizer = TfidfVectorizer::fit(&docs);
        let row = vectorizer.transform("xylophone zeppelin");
        assert!(row.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_classifier_separates_tiny_corpus() {
        let (docs, labels) = tiny_corpus();
        let vectorizer = TfidfVectorizer::fit(&docs);
        let rows: Vec<Vec<f64>> = docs.iter().map(|d| vectorizer.transform(d)).collect();
        let classifier = SoftmaxClassifier::fit(&rows, &labels);

        for (row, &label) in rows.iter().zip(&labels) {
            let probs = classifier.predict_proba(row);
            let argmax = probs
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .unwrap()
                .0;
            assert_eq!(argmax, label);
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (docs, labels) = tiny_corpus();
        let vectorizer = TfidfVectorizer::fit(&docs);
        let rows: Vec<Vec<f64>> = docs.iter().map(|d| vectorizer.transform(d)).collect();
        let classifier = SoftmaxClassifier::fit(&rows, &labels);

        let probs = classifier.predict_proba(&vectorizer.transform("share otp"));
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (docs, labels) = tiny_corpus();
        let vectorizer = TfidfVectorizer::fit(&docs);
        let rows: Vec<Vec<f64>> = docs.iter().map(|d| vectorizer.transform(d)).collect();
        let a = SoftmaxClassifier::fit(&rows, &labels);
        let b = SoftmaxClassifier::fit(&rows, &labels);
        assert_eq!(a.weights, b.weights);
    }
}
