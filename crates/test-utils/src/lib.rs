use anyhow::Result;
use archivist::errors::GatewayError;
use archivist::providers::ai::{AiProvider, EmbeddingProvider, ImageInput};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// --- Fixtures ---

/// A few bytes that start like a JPEG. Providers never decode images, so this
/// is enough to exercise the pipeline.
pub const FAKE_JPEG: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-bytes";

/// Writes a fake JPEG named `name` into `dir` and returns its path.
pub fn write_fixture_image(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, FAKE_JPEG)?;
    Ok(path)
}

// --- Mock Captioning Provider ---

/// A captioning provider that replays queued responses in order.
///
/// `Err` entries are returned as `GatewayError::AiApi`. Once the queue is empty
/// every call fails.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockAiProvider {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::default();
        for response in responses {
            mock.add_response(response);
        }
        mock
    }

    /// Queues a successful response.
    pub fn add_response(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queues a failure.
    pub fn add_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
    }

    /// Retrieves the recorded `(prompt, image byte count)` pairs.
    pub fn get_calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn describe_image(
        &self,
        prompt: &str,
        image: &ImageInput,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), image.bytes.len()));

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(GatewayError::AiApi(message)),
            None => Err(GatewayError::AiApi(
                "MockAiProvider: No response programmed.".to_string(),
            )),
        }
    }
}

// --- Mock Embedding Provider ---

/// An embedding provider that returns a fixed vector unless a failure has been
/// programmed for the exact input text.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    vector: Vec<f32>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEmbeddingProvider {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            failures: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Makes every call embedding exactly `text` fail with `message`.
    pub fn fail_on(&self, text: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(text.to_string(), message.to_string());
    }

    /// Retrieves the texts that were sent for embedding, in call order.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(vec![0.1, 0.2, 0.3])
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        self.calls.lock().unwrap().push(text.to_string());

        if let Some(message) = self.failures.lock().unwrap().get(text) {
            return Err(GatewayError::AiApi(message.clone()));
        }
        Ok(self.vector.clone())
    }
}
