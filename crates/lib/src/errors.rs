use std::path::PathBuf;
use thiserror::Error;

/// Failures at the model gateway boundary (captioning and embedding calls).
///
/// These never abort a run. A captioning failure turns into an error record for
/// the image; an embedding failure turns into an inline error marker.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI API: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI API response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI API returned an error: {0}")]
    AiApi(String),
    #[error("AI API returned no content")]
    EmptyResponse,
    #[error("Failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the pipeline glue: discovery, output naming and persistence.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input directory '{0}' does not exist or is not a directory")]
    InputDirMissing(PathBuf),
    #[error("'{0}' has no usable file name")]
    InvalidImagePath(PathBuf),
    #[error("Images '{first}' and '{second}' would both be written to '{output}'")]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}
