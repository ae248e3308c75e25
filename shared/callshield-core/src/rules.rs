//! Keyword rule engine
//!
//! Scans the raw transcript against a static multilingual weighted-keyword
//! table plus sensitive-data regexes (OTP-like digit groups, card numbers,
//! CVV). Matching is substring containment, not word-boundary: short phrases
//! can fire inside longer words. That is inherited design debt, kept as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ordered weighted phrase table. Order matters for the matched-keyword
/// list in the result.
const FRAUD_PATTERNS: &[(&str, f64)] = &[
    // English
    ("otp", 0.4),
    ("one time password", 0.4),
    ("account blocked", 0.4),
    ("bank", 0.2),
    ("verify", 0.3),
    ("urgent", 0.3),
    ("immediately", 0.25),
    ("click", 0.3),
    ("transfer", 0.3),
    ("upi", 0.3),
    ("pin", 0.4),
    ("kyc", 0.3),
    ("refund", 0.3),
    ("lottery", 0.4),
    ("expire", 0.3),
    ("cvv", 0.5),
    ("credit card", 0.3),
    ("debit card", 0.3),
    ("download", 0.2),
    ("anydesk", 0.5),
    ("teamviewer", 0.5),
    ("quicksupport", 0.5),
    // Hindi
    ("turant", 0.25),
    ("abhi", 0.2),
    ("khata", 0.3),
    ("bank se", 0.3),
    ("otp batao", 0.5),
    ("bhej", 0.2),
    ("paise", 0.2),
    ("block ho gaya", 0.4),
    // Tamil
    ("vangi", 0.2),
    ("kanakku", 0.2),
    ("udane", 0.25),
    ("kuriyeedu", 0.3),
    // Telugu
    ("vente", 0.25),
    ("pampandi", 0.2),
    ("account block", 0.4),
];

/// Sensitive-data shapes. Each fires only when the text also mentions
/// otp/code/pin somewhere.
static SENSITIVE_REGEX: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("OTP_Pattern", Regex::new(r"\b\d{4,6}\b").unwrap()),
        ("Card_Pattern", Regex::new(r"\b\d{16}\b").unwrap()),
        ("CVV_Pattern", Regex::new(r"\b\d{3}\b").unwrap()),
    ]
});

const SENSITIVE_BONUS: f64 = 0.3;
const URGENCY_BONUS: f64 = 0.25;

const URGENCY_WORDS: &[&str] = &[
    "urgent",
    "immediately",
    "now",
    "within",
    "last chance",
    "final warning",
    "turant",
    "udane",
];

/// Rule label thresholds on the clamped 0.0–1.0 score.
const HIGH_THRESHOLD: f64 = 0.75;
const MEDIUM_THRESHOLD: f64 = 0.35;
const LOW_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLabel {
    Safe,
    Low,
    Medium,
    High,
}

impl RuleLabel {
    /// Medium and high rule labels are authoritative: they force the final
    /// fraud verdict regardless of the classifier.
    pub fn forces_fraud(self) -> bool {
        matches!(self, RuleLabel::Medium | RuleLabel::High)
    }
}

/// Result of one rule-engine pass. Independent of the feature extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResult {
    pub score: u8,
    pub label: RuleLabel,
    pub matched_keywords: Vec<String>,
}

/// Score a raw transcript against the keyword table and sensitive-data
/// regexes. Deterministic, no external calls; empty input is safe.
pub fn analyze_keywords(text: &str) -> RuleResult {
    if text.is_empty() {
        return RuleResult {
            score: 0,
            label: RuleLabel::Safe,
            matched_keywords: Vec::new(),
        };
    }

    let lower = text.to_lowercase();
    let mut score = 0.0;
    let mut matched = Vec::new();

    for (phrase, weight) in FRAUD_PATTERNS {
        if lower.contains(phrase) {
            score += weight;
            matched.push((*phrase).to_string());
        }
    }

    let mentions_secret = lower.contains("otp") || lower.contains("code") || lower.contains("pin");
    for (name, pattern) in SENSITIVE_REGEX.iter() {
        if pattern.is_match(text) && mentions_secret {
            score += SENSITIVE_BONUS;
            matched.push(format!("RegEx:{name}"));
        }
    }

    let urgency_hits = URGENCY_WORDS.iter().filter(|w| lower.contains(**w)).count();
    if urgency_hits >= 2 {
        score += URGENCY_BONUS;
        matched.push("urgency-language".to_string());
    }

    let score = score.min(1.0);

    let label = if score >= HIGH_THRESHOLD {
        RuleLabel::High
    } else if score >= MEDIUM_THRESHOLD {
        RuleLabel::Medium
    } else if score > LOW_THRESHOLD {
        RuleLabel::Low
    } else {
        RuleLabel::Safe
    };

    RuleResult {
        score: (score * 100.0).round() as u8,
        label,
        matched_keywords: matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_safe() {
        let result = analyze_keywords("");
        assert_eq!(result.score, 0);
        assert_eq!(result.label, RuleLabel::Safe);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let result = analyze_keywords("Please share your OTP");
        assert!(result.matched_keywords.contains(&"otp".to_string()));
        assert!(result.score > 0);
    }

    #[test]
    fn test_substring_matching_is_not_word_bounded() {
        // "pin" fires inside "spinning" - known design debt, preserved.
        let result = analyze_keywords("the wheel keeps spinning");
        assert!(result.matched_keywords.contains(&"pin".to_string()));
    }

    #[test]
    fn test_sensitive_regex_requires_secret_mention() {
        // Digits alone do not trigger the bonus.
        let plain = analyze_keywords("your order number is 482913");
        assert!(!plain.matched_keywords.iter().any(|m| m.starts_with("RegEx:")));

        // Digits plus "otp" do.
        let otp = analyze_keywords("your otp is 482913");
        assert!(otp.matched_keywords.contains(&"RegEx:OTP_Pattern".to_string()));
    }

    #[test]
    fn test_urgency_language_bonus() {
        let result = analyze_keywords("act now, this is urgent");
        assert!(result.matched_keywords.contains(&"urgency-language".to_string()));
    }

    #[test]
    fn test_high_risk_scam_text() {
        let text = "Your bank account blocked. Share OTP 123456 immediately to verify. \
                    Urgent, transfer now!";
        let result = analyze_keywords(text);
        assert_eq!(result.label, RuleLabel::High);
        assert!(result.score >= 75);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let text = "otp one time password account blocked bank verify urgent immediately \
                    click transfer upi pin kyc refund lottery expire cvv credit card \
                    debit card download anydesk teamviewer quicksupport";
        let result = analyze_keywords(text);
        assert_eq!(result.score, 100);
        assert_eq!(result.label, RuleLabel::High);
    }

    #[test]
    fn test_only_medium_and_high_force_fraud() {
        assert!(!RuleLabel::Safe.forces_fraud());
        assert!(!RuleLabel::Low.forces_fraud());
        assert!(RuleLabel::Medium.forces_fraud());
        assert!(RuleLabel::High.forces_fraud());
    }

    #[test]
    fn test_benign_text_is_safe() {
        let result = analyze_keywords("Your pharmacy prescription is ready for pickup.");
        assert_eq!(result.label, RuleLabel::Safe);
    }

    #[test]
    fn test_label_thresholds() {
        // "cvv" alone: 0.5 -> medium
        let medium = analyze_keywords("cvv");
        assert_eq!(medium.label, RuleLabel::Medium);

        // "bank" alone: 0.2 -> low
        let low = analyze_keywords("bank");
        assert_eq!(low.label, RuleLabel::Low);
    }
}
