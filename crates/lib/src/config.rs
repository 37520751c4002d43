//! # Application Configuration
//!
//! This module defines the configuration used by a captioning run and the logic
//! for loading it from an optional YAML file and environment variables. The
//! resulting `AppConfig` is built once at start-up and handed to the provider
//! factory and the pipeline; nothing reads configuration from globals.

use crate::constants::{
    DEFAULT_CAPTION_MODEL, DEFAULT_EMBEDDING_MODEL, DEFAULT_GEMINI_API_BASE, DEFAULT_INPUT_DIR,
    DEFAULT_OUTPUT_DIR,
};
use crate::prompts::ARCHIVAL_CAPTION_PROMPT;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// The configuration file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "archivist.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
    /// No API credential was supplied for a provider that needs one.
    MissingApiKey,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::MissingApiKey => write!(
                f,
                "No API key configured. Set GEMINI_API_KEY (or ARCHIVIST_API_KEY) before running."
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// Which captioning/embedding API family to talk to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    /// Any OpenAI-compatible server (`/chat/completions` and `/embeddings`).
    Local,
}

/// The resolved configuration for a run.
#[derive(Deserialize, Clone)]
pub struct AppConfig {
    /// The API credential. Loaded from `GEMINI_API_KEY` or `ARCHIVIST_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_caption_model")]
    pub caption_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Base URL the caption and embedding endpoints are derived from.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Full caption endpoint, overriding the one derived from `api_base_url`.
    #[serde(default)]
    pub caption_api_url: Option<String>,
    /// Full embedding endpoint, overriding the one derived from `api_base_url`.
    #[serde(default)]
    pub embedding_api_url: Option<String>,
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Replaces the built-in archival caption prompt.
    #[serde(default)]
    pub caption_prompt: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_caption_model() -> String {
    DEFAULT_CAPTION_MODEL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_GEMINI_API_BASE.to_string()
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("provider", &self.provider)
            .field("caption_model", &self.caption_model)
            .field("embedding_model", &self.embedding_model)
            .field("api_base_url", &self.api_base_url)
            .field("caption_api_url", &self.caption_api_url)
            .field("embedding_api_url", &self.embedding_api_url)
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("caption_prompt", &self.caption_prompt.is_some())
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// The endpoint the caption request is posted to.
    pub fn caption_endpoint(&self) -> String {
        if let Some(url) = &self.caption_api_url {
            return url.clone();
        }
        let base = self.api_base_url.trim_end_matches('/');
        match self.provider {
            ProviderKind::Gemini => {
                format!("{base}/models/{}:generateContent", self.caption_model)
            }
            ProviderKind::Local => format!("{base}/chat/completions"),
        }
    }

    /// The endpoint embedding requests are posted to.
    pub fn embedding_endpoint(&self) -> String {
        if let Some(url) = &self.embedding_api_url {
            return url.clone();
        }
        let base = self.api_base_url.trim_end_matches('/');
        match self.provider {
            ProviderKind::Gemini => {
                let model = self
                    .embedding_model
                    .strip_prefix("models/")
                    .unwrap_or(&self.embedding_model);
                format!("{base}/models/{model}:embedContent")
            }
            ProviderKind::Local => format!("{base}/embeddings"),
        }
    }

    /// The prompt sent with every image.
    pub fn caption_prompt(&self) -> &str {
        self.caption_prompt
            .as_deref()
            .unwrap_or(ARCHIVAL_CAPTION_PROMPT)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the run configuration.
///
/// Layers, lowest precedence first:
/// 1. Built-in defaults.
/// 2. A YAML file: `config_path` if given (it must exist), otherwise
///    `archivist.yml` in the working directory if present. `${VAR}` placeholders
///    are substituted from the environment.
/// 3. `ARCHIVIST_...` environment variables (e.g. `ARCHIVIST_OUTPUT_DIR`).
///
/// If no key was set by any layer, `GEMINI_API_KEY` is consulted. A Gemini
/// configuration without a key is rejected; there is no built-in credential.
pub fn get_config(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let file_content = match config_path {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!(
                    "Config file not found at '{}'.",
                    path.display()
                ))
            })?;
            info!("Loading configuration from '{}'.", path.display());
            Some(content)
        }
        None => {
            let content = read_and_substitute(Path::new(DEFAULT_CONFIG_FILE))?;
            if content.is_some() {
                info!("Loading configuration from '{DEFAULT_CONFIG_FILE}'.");
            }
            content
        }
    };

    if let Some(content) = file_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("ARCHIVIST")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if config.api_key.as_deref().map_or(true, str::is_empty) {
        config.api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
    }

    if config.provider == ProviderKind::Gemini && config.api_key.is_none() {
        return Err(ConfigError::MissingApiKey);
    }

    Ok(config)
}
