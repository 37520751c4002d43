//! # Archivist
//!
//! This crate batch-captions archival images. Each image is sent to a
//! captioning model together with a museum-style prompt, the model's answer is
//! normalized and forced into a fixed record shape, two embeddings are
//! attached, and the result is written as one JSON file per image alongside a
//! plain-text run log.
//!
//! The entry point is [`ImagePipeline`], built from an [`AppConfig`].

pub mod config;
pub mod constants;
pub mod discovery;
pub mod enrich;
pub mod errors;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod schema;
pub mod sink;
pub mod types;

pub use config::{get_config, AppConfig, ConfigError, ProviderKind};
pub use errors::{GatewayError, PipelineError};
pub use pipeline::ImagePipeline;
pub use types::{
    CaptionRecord, EmbeddingField, EnrichedRecord, Entities, ErrorRecord, ImageOutcome,
    LooseRecord, RunSummary,
};
