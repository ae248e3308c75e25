//! Transcript normalization
//!
//! Canonicalizes raw transcript text before vectorization: case folding,
//! whitespace and punctuation collapse, and placeholder substitution for
//! phone numbers, emails, URLs and currency amounts.

use once_cell::sync::Lazy;
use regex::Regex;

static REPEAT_EXCLAIM: Lazy<Regex> = Lazy::new(|| Regex::new(r"!{2,}").unwrap());
static REPEAT_QUESTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?{2,}").unwrap());
static REPEAT_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap());
static EMAIL_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[A-Za-z0-9$\-_@.&+!*(),%/?=#~]+").unwrap());
static DOLLAR_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+(?:,\d{3})*(?:\.\d{2})?").unwrap());
static RUPEE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"₹\d+(?:,\d{2,3})*(?:\.\d{2})?").unwrap());

/// Normalize a raw transcript. Total function: empty input yields empty
/// output, nothing here can fail.
pub fn normalize_text(text: &str) -> String {
    let text = text.to_lowercase();

    // Collapse whitespace runs to single spaces
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    // Collapse repeated punctuation
    let text = REPEAT_EXCLAIM.replace_all(&text, "!");
    let text = REPEAT_QUESTION.replace_all(&text, "?");
    let text = REPEAT_PERIOD.replace_all(&text, ".");

    // Placeholder substitution
    let text = PHONE_NUMBER.replace_all(&text, "PHONE_NUMBER");
    let text = EMAIL_ADDRESS.replace_all(&text, "EMAIL_ADDRESS");
    let text = URL.replace_all(&text, "URL");
    let text = DOLLAR_AMOUNT.replace_all(&text, "CURRENCY_AMOUNT");
    let text = RUPEE_AMOUNT.replace_all(&text, "CURRENCY_AMOUNT");

    text.into_owned()
}
