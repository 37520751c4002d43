pub mod embedding;
pub mod gemini;
pub mod local;

use crate::errors::GatewayError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::{generate_embedding, EmbeddingApi, EmbeddingClient};
use std::fmt::Debug;

/// Raw image bytes plus the MIME type they are sent with.
#[derive(Clone, Debug)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// A trait for interacting with a captioning-capable AI provider.
///
/// Implementations send one prompt and one image and return the model's
/// free-form answer untouched. No retry is performed.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Asks the model to describe `image` following `prompt`.
    async fn describe_image(&self, prompt: &str, image: &ImageInput)
        -> Result<String, GatewayError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// A trait for turning text into a dense vector.
///
/// Empty input is a valid call and must not be short-circuited by callers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug + DynClone {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError>;
}

dyn_clone::clone_trait_object!(EmbeddingProvider);

/// Builds the HTTP client shared by every provider, applying the optional
/// request timeout from configuration.
pub(crate) fn build_http_client(
    timeout: Option<std::time::Duration>,
) -> Result<reqwest::Client, GatewayError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(GatewayError::ReqwestClientBuild)
}
