#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the integration tests.

use archivist::providers::ai::{AiProvider, EmbeddingProvider};
use archivist::sink::OutputSink;
use archivist::ImagePipeline;
use archivist_test_utils::{MockAiProvider, MockEmbeddingProvider};
use dotenvy::dotenv;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub const TEST_PROMPT: &str = "Describe this archival image as JSON.";

/// Builds a pipeline over mock providers writing into `output_dir`.
pub fn mock_pipeline(
    captioner: &MockAiProvider,
    embedder: &MockEmbeddingProvider,
    output_dir: &Path,
) -> ImagePipeline {
    let captioner: Box<dyn AiProvider> = Box::new(captioner.clone());
    let embedder: Box<dyn EmbeddingProvider> = Box::new(embedder.clone());
    ImagePipeline::new(captioner, embedder, TEST_PROMPT, OutputSink::new(output_dir))
}

/// Reads a JSON file into a `serde_json::Value`.
pub fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}
