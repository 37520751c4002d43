//! # Record Enrichment
//!
//! Attaches embeddings for the caption and the detailed description.

use crate::providers::ai::EmbeddingProvider;
use crate::types::{CaptionRecord, EmbeddingField, EnrichedRecord};
use tracing::warn;

/// Embeds `text`, turning a gateway failure into an inline error marker.
pub async fn embed_field(
    embedder: &dyn EmbeddingProvider,
    field: &str,
    text: &str,
) -> EmbeddingField {
    match embedder.embed(text).await {
        Ok(vector) => EmbeddingField::Vector(vector),
        Err(e) => {
            warn!("Embedding for '{field}' failed: {e}");
            EmbeddingField::failed(e.to_string())
        }
    }
}

/// Computes both embeddings and returns the enriched record.
///
/// The caption is embedded first, then the description. Empty strings are
/// still sent. Each call fails independently and neither failure aborts the
/// image.
pub async fn enrich_record(
    embedder: &dyn EmbeddingProvider,
    record: CaptionRecord,
) -> EnrichedRecord {
    let caption_embedding = embed_field(embedder, "caption", &record.caption).await;
    let description_embedding =
        embed_field(embedder, "detailed_description", &record.detailed_description).await;

    EnrichedRecord {
        record,
        caption_embedding,
        description_embedding,
    }
}
