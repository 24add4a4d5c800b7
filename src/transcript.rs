/*!
 * Transcript data model.
 *
 * Timed segments come from the speech-recognition service, already ordered
 * and non-overlapping. Translated segments are produced by the translation
 * pipeline, 1:1 with the input. Highlights are model-proposed and untrusted
 * until they pass through the grounding corrector.
 */

use serde::{Deserialize, Serialize};

/// A single timed transcript segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    /// Start time in seconds from the beginning of the recording
    pub start: f64,

    /// End time in seconds, never before `start`
    pub end: f64,

    /// Recognized text for this time span
    pub text: String,
}

impl TimedSegment {
    /// Create a new segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Duration of this segment in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// A translated transcript segment, paired with its original text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedSegment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Original recognized text
    pub original_text: String,

    /// Translated text; equals `original_text` when the batch fell back
    pub translated_text: String,
}

/// A model-proposed highlight of the recording
///
/// The title is expected to stay under 20 characters and the description
/// under 50, but that is a prompt contract with the model, not something
/// this type enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// Offset in whole seconds from the start of the recording
    pub timestamp: u32,

    /// Short highlight title
    pub title: String,

    /// One-line description of the highlighted content
    pub description: String,
}

/// Full result of a speech-to-text transcription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    /// Full recognized text
    pub text: String,

    /// Detected or hinted language code
    pub language: String,

    /// Confidence of the language detection
    #[serde(default = "default_language_probability")]
    pub language_probability: f64,

    /// Timed segments making up the transcription
    #[serde(default)]
    pub segments: Vec<TimedSegment>,
}

fn default_language_probability() -> f64 {
    1.0
}

impl Transcription {
    /// Total duration in seconds, taken from the last segment's end.
    pub fn duration(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.end)
    }
}
