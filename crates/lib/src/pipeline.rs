//! # Image Pipeline
//!
//! Drives one image at a time through caption → normalize → enforce → embed →
//! persist, and runs that sequence over a whole input directory.
//!
//! Per image the states are `Started → Captioned → Normalized → Parsed →
//! Embedded → Persisted`, or `Normalized → ParseFailed → Persisted` when the
//! response cannot be parsed. Either way exactly one JSON file is written.

use crate::config::AppConfig;
use crate::constants::JPEG_MIME_TYPE;
use crate::discovery::{discover_images, plan_outputs};
use crate::enrich::enrich_record;
use crate::errors::{GatewayError, PipelineError};
use crate::normalize::clean_model_response;
use crate::providers::ai::{AiProvider, EmbeddingProvider, ImageInput};
use crate::providers::factory::create_providers;
use crate::schema::{enforce_schema, error_record, parse_loose_record};
use crate::sink::OutputSink;
use crate::types::{ImageOutcome, LooseRecord, RunSummary};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// Sequential captioning pipeline bound to a pair of providers and an output
/// directory.
#[derive(Debug)]
pub struct ImagePipeline {
    captioner: Box<dyn AiProvider>,
    embedder: Box<dyn EmbeddingProvider>,
    prompt: String,
    sink: OutputSink,
}

impl ImagePipeline {
    pub fn new(
        captioner: Box<dyn AiProvider>,
        embedder: Box<dyn EmbeddingProvider>,
        prompt: impl Into<String>,
        sink: OutputSink,
    ) -> Self {
        Self {
            captioner,
            embedder,
            prompt: prompt.into(),
            sink,
        }
    }

    /// Builds the providers and sink described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let (captioner, embedder) = create_providers(config)?;
        Ok(Self::new(
            captioner,
            embedder,
            config.caption_prompt(),
            OutputSink::new(&config.output_dir),
        ))
    }

    async fn caption(&self, image: &Path) -> Result<String, GatewayError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|source| GatewayError::ImageRead {
                path: image.to_path_buf(),
                source,
            })?;
        let input = ImageInput {
            bytes,
            mime_type: JPEG_MIME_TYPE.to_string(),
        };
        self.captioner.describe_image(&self.prompt, &input).await
    }

    /// Appends to the run log. A failed append is reported but never fails the
    /// image, so an outcome always matches what is on disk.
    fn append_log(&self, message: &str) {
        if let Err(e) = self.sink.log(message) {
            warn!("Could not append to {}: {e}", self.sink.log_path().display());
        }
    }

    /// Processes a single image and writes its record as `output_name`.
    ///
    /// Caption and parse failures are recorded in an `ErrorRecord` and reported
    /// as `ImageOutcome::Failed`. Embedding failures are recorded inline and the
    /// image still completes. Only a failure to write the record is returned as
    /// `Err`.
    #[instrument(skip(self, image), fields(image = %image.display()))]
    pub async fn process_image(
        &self,
        image: &Path,
        output_name: &str,
    ) -> Result<ImageOutcome, PipelineError> {
        info!("Processing {}...", image.display());
        self.append_log(&format!("Processing {}...", image.display()));

        let raw = self.caption(image).await;
        debug!(state = "Captioned", ok = raw.is_ok());

        let normalized = clean_model_response(&raw);
        debug!(state = "Normalized");

        let fields = match parse_loose_record(normalized) {
            LooseRecord::Parsed(fields) => fields,
            LooseRecord::ParseFailed(message) => {
                debug!(state = "ParseFailed", %message);
                let record = error_record(&message, &raw);
                error!("JSON parsing failed for {}: {message}", image.display());
                self.append_log(&format!("JSON parsing failed for {}", image.display()));
                let output = self.sink.write_record(output_name, &record)?;
                return Ok(ImageOutcome::Failed {
                    output,
                    error: record.error,
                });
            }
        };
        debug!(state = "Parsed", keys = fields.len());

        let filename = image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let record = enforce_schema(&filename, &fields);
        let enriched = enrich_record(&*self.embedder, record).await;
        debug!(
            state = "Embedded",
            caption_failed = enriched.caption_embedding.is_failed(),
            description_failed = enriched.description_embedding.is_failed()
        );

        let output = self.sink.write_record(output_name, &enriched)?;
        self.append_log(&format!("Completed {}", image.display()));
        info!("Completed {}", image.display());
        Ok(ImageOutcome::Completed { output })
    }

    /// Processes `images` in order.
    ///
    /// Output names are resolved up front and a collision aborts the run before
    /// any image is touched. After that, a failing image never stops the others.
    /// A path with no file name is counted as failed without being processed.
    pub async fn run_images(&self, images: &[PathBuf]) -> Result<RunSummary, PipelineError> {
        let plan = plan_outputs(images)?;
        let mut summary = RunSummary {
            discovered: images.len(),
            failed: plan.rejected.len(),
            ..Default::default()
        };
        for path in &plan.rejected {
            error!("Skipping {}: it has no usable file name", path.display());
        }

        for item in &plan.images {
            match self.process_image(&item.path, &item.output_name).await {
                Ok(ImageOutcome::Completed { .. }) => summary.completed += 1,
                Ok(ImageOutcome::Failed { .. }) => summary.failed += 1,
                Err(e) => {
                    error!("Could not persist results for {}: {e}", item.path.display());
                    summary.failed += 1;
                    summary.write_failures.push(item.path.clone());
                }
            }
        }

        info!(
            "Run finished: {} completed, {} failed, {} total",
            summary.completed, summary.failed, summary.discovered
        );
        Ok(summary)
    }

    /// Discovers the images in `input_dir` and processes them all.
    pub async fn run(&self, input_dir: &Path) -> Result<RunSummary, PipelineError> {
        let images = discover_images(input_dir)?;
        if images.is_empty() {
            warn!("No JPG images found in '{}'", input_dir.display());
            return Ok(RunSummary::default());
        }
        self.run_images(&images).await
    }
}
