//! Language detection for English, Hindi and Telugu
//!
//! Two layers, mirroring how the pipeline treats detection as best-effort:
//! a statistical pass over per-language marker tokens, then a script-range
//! fallback (Devanagari / Telugu / Latin character counts). Detection never
//! fails; when every signal is empty the result is English.

use serde::{Deserialize, Serialize};

/// Supported languages, in tie-break order. When script counts tie, the
/// earlier variant wins (a later candidate needs a strictly greater count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "hi")]
    Hi,
    #[serde(rename = "te")]
    Te,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Te => "te",
        }
    }
}

/// High-frequency marker tokens per language. Hindi and Telugu include both
/// native-script function words and common romanized forms heard in call
/// transcripts.
const EN_MARKERS: &[&str] = &[
    "the", "is", "are", "you", "your", "this", "that", "and", "for", "with", "have", "will",
    "please", "call", "account", "from", "now",
];
const HI_MARKERS: &[&str] = &[
    "है", "का", "की", "के", "आप", "आपका", "और", "में", "से", "नहीं", "तुरंत", "बताएं", "turant", "abhi",
    "paise", "batao", "bhej",
];
const TE_MARKERS: &[&str] = &[
    "మీ", "మీరు", "ఉంది", "అని", "లో", "కాదు", "వెంటనే", "చెప్పండి", "vente", "pampandi", "udane",
];

/// Detect the dominant language of a raw (non-normalized) transcript.
pub fn detect_language(text: &str) -> Language {
    let cleaned = clean_for_detection(text);
    if cleaned.is_empty() {
        return Language::En;
    }

    if let Some(lang) = detect_by_markers(&cleaned) {
        return lang;
    }

    detect_by_script(text)
}

/// Strip digits, punctuation and symbols, keeping only letters and spaces.
fn clean_for_detection(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphabetic() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Statistical layer: count marker-token hits per language. `None` when no
/// marker matches at all (detection failure, triggers the script fallback).
fn detect_by_markers(cleaned: &str) -> Option<Language> {
    let lower = cleaned.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();

    let count_hits = |markers: &[&str]| tokens.iter().filter(|t| markers.contains(*t)).count();

    let candidates = [
        (Language::En, count_hits(EN_MARKERS)),
        (Language::Hi, count_hits(HI_MARKERS)),
        (Language::Te, count_hits(TE_MARKERS)),
    ];

    let mut best: Option<(Language, usize)> = None;
    for (lang, hits) in candidates {
        if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
            best = Some((lang, hits));
        }
    }
    best.map(|(lang, _)| lang)
}

/// Script fallback: count code points per script range and return the
/// language with the highest count. Fixed evaluation order en, hi, te; a
/// later language must strictly exceed the current winner.
fn detect_by_script(text: &str) -> Language {
    let mut latin = 0usize;
    let mut devanagari = 0usize;
    let mut telugu = 0usize;

    for c in text.chars() {
        let code = c as u32;
        if c.is_ascii_alphabetic() {
            latin += 1;
        } else if (0x0900..=0x097F).contains(&code) {
            devanagari += 1;
        } else if (0x0C00..=0x0C7F).contains(&code) {
            telugu += 1;
        }
    }

    let mut winner = Language::En;
    let mut best = latin;
    if devanagari > best {
        winner = Language::Hi;
        best = devanagari;
    }
    if telugu > best {
        winner = Language::Te;
    }
    winner
}
