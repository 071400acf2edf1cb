//! Shared data types flowing through the analysis pipeline.

use serde::{Deserialize, Serialize};

/// A single photo submitted for analysis.
///
/// Immutable once constructed; the file name doubles as the correlation id
/// in logs and progress events.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Raw image bytes
    pub image: Vec<u8>,
    /// Original file name (used for logging and the deterministic fallback)
    pub file_name: String,
    /// Optional reverse-geocoded place name, passed to providers as context
    pub place_hint: Option<String>,
}

impl AnalysisRequest {
    pub fn new(image: Vec<u8>, file_name: impl Into<String>, place_hint: Option<String>) -> Self {
        Self {
            image,
            file_name: file_name.into(),
            place_hint,
        }
    }
}

/// The classification produced for a photo.
///
/// Both fields are non-empty and filename-safe by construction — the vision
/// client sanitizes provider output and substitutes fallbacks before this
/// struct reaches a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Location category, e.g. "Strand" (also the sequence counter key)
    pub location: String,
    /// Scene description, e.g. "sonnig"
    pub scene: String,
}

impl AnalysisResult {
    pub fn new(location: impl Into<String>, scene: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            scene: scene.into(),
        }
    }
}

/// The fully processed outcome for one photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// File name the photo arrived with
    pub original_name: String,
    /// Location category from analysis
    pub location: String,
    /// Scene description from analysis
    pub scene: String,
    /// Per-category ordinal issued by the sequence counter
    pub sequence: u32,
    /// Deterministic final name, e.g. "Strand_sonnig_007.jpg"
    pub final_name: String,
}

/// Progress events streamed to the caller while a batch runs.
///
/// Delivered over a channel so the consumer can back a streaming HTTP
/// response, a progress bar, or a test assertion equally.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A photo was submitted to the batch; it may still be waiting for a
    /// queue slot
    Started { file_name: String },
    /// A photo finished with a result
    Finished(PhotoRecord),
    /// A photo failed; siblings are unaffected
    Failed { file_name: String, error: String },
}
