//! # AI Provider Factory
//!
//! Builds the captioning and embedding providers from an `AppConfig`, so the CLI
//! and tests share one construction path.

use crate::{
    config::{AppConfig, ProviderKind},
    errors::GatewayError,
    providers::ai::{
        gemini::GeminiProvider, local::LocalAiProvider, AiProvider, EmbeddingApi,
        EmbeddingClient, EmbeddingProvider,
    },
};
use tracing::info;

/// The captioning provider and the embedding provider for one run.
pub type ProviderPair = (Box<dyn AiProvider>, Box<dyn EmbeddingProvider>);

/// Creates the providers described by `config`.
pub fn create_providers(config: &AppConfig) -> Result<ProviderPair, GatewayError> {
    let caption_url = config.caption_endpoint();
    let embedding_url = config.embedding_endpoint();
    let timeout = config.request_timeout();

    info!(
        "Configuring {:?} providers: caption model '{}' at {}, embedding model '{}' at {}",
        config.provider, config.caption_model, caption_url, config.embedding_model, embedding_url
    );

    let pair: ProviderPair = match config.provider {
        ProviderKind::Gemini => {
            let api_key = config.api_key.clone().unwrap_or_default();
            (
                Box::new(GeminiProvider::new(caption_url, api_key.clone(), timeout)?),
                Box::new(EmbeddingClient::new(
                    EmbeddingApi::Gemini,
                    embedding_url,
                    config.embedding_model.clone(),
                    Some(api_key),
                    timeout,
                )?),
            )
        }
        ProviderKind::Local => (
            Box::new(LocalAiProvider::new(
                caption_url,
                config.api_key.clone(),
                Some(config.caption_model.clone()),
                timeout,
            )?),
            Box::new(EmbeddingClient::new(
                EmbeddingApi::OpenAi,
                embedding_url,
                config.embedding_model.clone(),
                config.api_key.clone(),
                timeout,
            )?),
        ),
    };

    Ok(pair)
}
