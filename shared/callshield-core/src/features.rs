//! Feature extraction
//!
//! Counts curated regex pattern families over the transcript (urgency,
//! money, personal-info requests, phone numbers, suspicious phrases,
//! emotional manipulation, tech-support and financial cues) plus plain text
//! statistics, and derives three composite scores with fixed design weights.
//! Matches are summed across patterns, not deduplicated: overlapping
//! families compound the count on purpose.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static URGENCY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(urgent|immediate|asap|right now|act now|hurry|quickly|fast)\b",
        r"\b(limited time|expires|deadline|last chance|final notice)\b",
        r"\b(don't wait|call now|respond immediately|now)\b",
    ])
});

static MONEY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\$\d+(?:,\d{3})*(?:\.\d{2})?",
        r"₹\d+(?:,\d{2,3})*(?:\.\d{2})?",
        r"\b(money|cash|dollars|rupees|payment|fee|cost|price|amount)\b",
        r"\b(credit card|bank account|debit card|paypal|venmo)\b",
        r"\b(refund|rebate|prize|lottery|winner|jackpot)\b",
    ])
});

static PERSONAL_INFO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(social security|ssn|sin|tax id)\b",
        r"\b(credit card|card number|cvv|expiry|expiration)\b",
        r"\b(bank account|routing number|account number)\b",
        r"\b(password|pin|passcode|security code)\b",
        r"\b(date of birth|dob|birthday|mother's maiden name)\b",
    ])
});

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
        r"\b\+\d{1,3}[-.]?\d{3,4}[-.]?\d{3,4}[-.]?\d{3,4}\b",
    ])
});

static SUSPICIOUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(microsoft|apple|google|amazon|paypal|ebay) (support|security|team)\b",
        r"\b(irs|government|police|fbi|homeland security)\b",
        r"\b(suspended|blocked|frozen|compromised|hacked)\b",
        r"\b(verify|confirm|update|validate) (account|information|details)\b",
        r"\b(click here|visit|go to|download|install)\b",
        r"\b(congratulations|winner|selected|chosen|qualified)\b",
        r"\b(free|guaranteed|risk-free|no obligation|limited offer)\b",
    ])
});

static MANIPULATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(worried|concerned|scared|afraid|panic|emergency)\b",
        r"\b(arrest|warrant|legal action|lawsuit|court|jail)\b",
        r"\b(family|loved ones|children|safety|security)\b",
        r"\b(help|assist|save|protect|secure)\b",
    ])
});

static TECH_SUPPORT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(computer|pc|laptop|device|system|software)\b",
        r"\b(virus|malware|infected|compromised|hacked)\b",
        r"\b(technical support|tech support|customer service)\b",
        r"\b(remote access|teamviewer|anydesk|logmein)\b",
    ])
});

static FINANCIAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(bank|credit union|financial institution)\b",
        r"\b(loan|mortgage|credit|debt|investment)\b",
        r"\b(interest rate|apr|fees|charges|penalty)\b",
        r"\b(account|balance|transaction|transfer)\b",
    ])
});

static CALLBACK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(call|phone|contact|reach) (back|us|me)\b",
        r"\b(return|give us a) call\b",
        r"\b(dial|press|enter) \d+\b",
    ])
});

static TIME_PRESSURE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(expires|deadline|limited time|act now|hurry)\b",
        r"\b(today|tonight|immediately|right now|asap)\b",
        r"\b(before|within) \d+ (hours|minutes|days)\b",
    ])
});

static AUTHORITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(official|authorized|certified|licensed)\b",
        r"\b(government|federal|state|irs|fbi)\b",
        r"\b(microsoft|apple|google|amazon|bank)\b",
        r"\b(department|agency|bureau|office)\b",
    ])
});

static VERIFICATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(verify|confirm|validate|authenticate)\b",
        r"\b(provide|give|share|tell) (us|me) your\b",
        r"\b(need|require|must have) your\b",
    ])
});

static SENTENCE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static NUMBER_TOKENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Fixed-size feature vector for one transcript. Created fresh per call,
/// never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,

    pub urgency_words: usize,
    pub money_mentions: usize,
    pub personal_info_requests: usize,
    pub phone_numbers: usize,
    pub suspicious_phrases: usize,
    pub emotional_manipulation: usize,
    pub tech_support_indicators: usize,
    pub financial_indicators: usize,

    pub exclamation_count: usize,
    pub question_count: usize,
    pub caps_ratio: f64,
    pub number_count: usize,

    pub callback_requests: usize,
    pub time_pressure: usize,
    pub authority_claims: usize,
    pub verification_requests: usize,

    pub fraud_score: f64,
    pub urgency_score: f64,
    pub manipulation_score: f64,
}

fn count_patterns(text: &str, patterns: &[Regex]) -> usize {
    patterns.iter().map(|re| re.find_iter(text).count()).sum()
}

fn caps_ratio(text: &str) -> f64 {
    let letters = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if letters == 0 {
        return 0.0;
    }
    let caps = text.chars().filter(|c| c.is_ascii_uppercase()).count();
    caps as f64 / letters as f64
}

/// Extract the full feature vector from a raw transcript.
pub fn extract_features(text: &str) -> FeatureVector {
    let lower = text.to_lowercase();

    let urgency_words = count_patterns(&lower, &URGENCY_PATTERNS);
    let money_mentions = count_patterns(&lower, &MONEY_PATTERNS);
    let personal_info_requests = count_patterns(&lower, &PERSONAL_INFO_PATTERNS);
    let suspicious_phrases = count_patterns(&lower, &SUSPICIOUS_PATTERNS);
    let emotional_manipulation = count_patterns(&lower, &MANIPULATION_PATTERNS);
    let callback_requests = count_patterns(&lower, &CALLBACK_PATTERNS);
    let time_pressure = count_patterns(&lower, &TIME_PRESSURE_PATTERNS);
    let authority_claims = count_patterns(&lower, &AUTHORITY_PATTERNS);
    let verification_requests = count_patterns(&lower, &VERIFICATION_PATTERNS);

    let word_count = text.split_whitespace().count();
    let caps = caps_ratio(text);
    let exclamation_count = text.matches('!').count();

    let fraud_score = {
        let raw = (urgency_words * 2
            + money_mentions * 3
            + personal_info_requests * 5
            + suspicious_phrases * 2
            + emotional_manipulation * 2
            + callback_requests
            + authority_claims * 2
            + verification_requests * 3) as f64;
        let normalized = if word_count > 0 {
            raw / word_count as f64 * 100.0
        } else {
            raw
        };
        normalized.clamp(0.0, 100.0)
    };

    let urgency_score = (urgency_words as f64 * 3.0
        + time_pressure as f64 * 2.0
        + exclamation_count as f64 * 0.5
        + caps * 10.0)
        .clamp(0.0, 100.0);

    let manipulation_score = (emotional_manipulation as f64 * 3.0
        + authority_claims as f64 * 2.0
        + verification_requests as f64 * 2.0)
        .clamp(0.0, 100.0);

    FeatureVector {
        word_count,
        char_count: text.chars().count(),
        sentence_count: SENTENCE_RUNS.find_iter(text).count(),
        urgency_words,
        money_mentions,
        personal_info_requests,
        phone_numbers: count_patterns(&lower, &PHONE_PATTERNS),
        suspicious_phrases,
        emotional_manipulation,
        tech_support_indicators: count_patterns(&lower, &TECH_SUPPORT_PATTERNS),
        financial_indicators: count_patterns(&lower, &FINANCIAL_PATTERNS),
        exclamation_count,
        question_count: text.matches('?').count(),
        caps_ratio: caps,
        number_count: NUMBER_TOKENS.find_iter(text).count(),
        callback_requests,
        time_pressure,
        authority_claims,
        verification_requests,
        fraud_score,
        urgency_score,
        manipulation_score,
    }
}

impl FeatureVector {
    /// Top-5 features for explanation: nonzero counts sorted descending,
    /// ties resolved by the fixed priority order below (stable sort keeps
    /// the push order on equal counts).
    pub fn important_features(&self) -> Vec<(&'static str, usize)> {
        let mut important: Vec<(&'static str, usize)> = [
            ("personal_info_requests", self.personal_info_requests),
            ("money_mentions", self.money_mentions),
            ("urgency_words", self.urgency_words),
            ("suspicious_phrases", self.suspicious_phrases),
            ("emotional_manipulation", self.emotional_manipulation),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect();

        important.sort_by(|a, b| b.1.cmp(&a.1));
        important.truncate(5);
        important
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let f = extract_features("");
        assert_eq!(f.word_count, 0);
        assert_eq!(f.fraud_score, 0.0);
        assert_eq!(f.caps_ratio, 0.0);
    }

    #[test]
    fn test_basic_counts() {
        let f = extract_features("Is this real? Act now! Call 555-123-4567.");
        assert_eq!(f.question_count, 1);
        assert_eq!(f.exclamation_count, 1);
        assert_eq!(f.sentence_count, 3);
        assert_eq!(f.phone_numbers, 1);
        assert!(f.urgency_words >= 1); // "act now" plus the bare "now"
    }

    #[test]
    fn test_overlapping_families_compound() {
        // "credit card" is both a money mention and a personal-info request.
        let f = extract_features("give me your credit card");
        assert!(f.money_mentions >= 1);
        assert!(f.personal_info_requests >= 1);
    }

    #[test]
    fn test_caps_ratio() {
        let f = extract_features("ABCd");
        assert!((f.caps_ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_composite_scores_in_range() {
        let shouty = "URGENT!!! Verify your account NOW! Share your PIN and card number immediately!";
        let f = extract_features(shouty);
        assert!(f.fraud_score >= 0.0 && f.fraud_score <= 100.0);
        assert!(f.urgency_score >= 0.0 && f.urgency_score <= 100.0);
        assert!(f.manipulation_score >= 0.0 && f.manipulation_score <= 100.0);
        assert!(f.urgency_score > 0.0);
    }

    #[test]
    fn test_pattern_hit_implies_word_token() {
        // Every pattern hit lives inside a whitespace token, so a nonzero
        // raw score is always divided by a nonzero word count.
        let f = extract_features("$5,000");
        assert_eq!(f.word_count, 1);
        assert!(f.money_mentions >= 1);
        assert!(f.fraud_score > 0.0);
    }

    #[test]
    fn test_important_features_ordering() {
        let f = extract_features("Share your PIN. Send money, money, money now!");
        let important = f.important_features();
        assert!(!important.is_empty());
        // Highest count first
        for pair in important.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_tie_break_priority() {
        // One personal-info hit and one urgency hit: personal info ranks first.
        let f = extract_features("tell me the password hurry");
        let important = f.important_features();
        assert_eq!(important[0].0, "personal_info_requests");
    }
}
