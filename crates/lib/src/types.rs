//! # Record Types
//!
//! The data shapes that flow between pipeline stages and end up on disk.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// The loosely-typed result of parsing a model response.
///
/// Only a JSON object counts as `Parsed`. Anything else, including a gateway
/// failure that was passed through the normalizer, is `ParseFailed`.
#[derive(Debug, Clone, PartialEq)]
pub enum LooseRecord {
    Parsed(Map<String, Value>),
    ParseFailed(String),
}

/// Named entities extracted from an image. All four fields are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
    pub date_estimate: String,
}

/// A schema-complete description of one image, before embeddings are attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionRecord {
    /// Base name of the source image. Never taken from model output.
    pub filename: String,
    pub caption: String,
    pub detailed_description: String,
    /// Deduplicated and sorted.
    pub tags: Vec<String>,
    pub contextual_category: String,
    pub entities: Entities,
}

/// The marker stored in place of a vector when an embedding call fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingFailure {
    pub error: String,
}

/// Either an embedding vector or the reason it could not be computed.
///
/// Serializes as a bare JSON array or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingField {
    Vector(Vec<f32>),
    Failed(EmbeddingFailure),
}

impl EmbeddingField {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(EmbeddingFailure {
            error: message.into(),
        })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The persisted unit for a successfully processed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: CaptionRecord,
    pub caption_embedding: EmbeddingField,
    pub description_embedding: EmbeddingField,
}

/// The persisted unit for an image whose caption response could not be parsed.
///
/// `raw` holds the unmodified model text, or `null` when the caption call
/// itself failed and no text was ever received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
    pub raw: Option<String>,
}

/// How a single image finished.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// An `EnrichedRecord` was written to `output`.
    Completed { output: PathBuf },
    /// An `ErrorRecord` was written to `output`.
    Failed { output: PathBuf, error: String },
}

/// Totals for one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub discovered: usize,
    pub completed: usize,
    pub failed: usize,
    /// Images whose record could not be written.
    pub write_failures: Vec<PathBuf>,
}
