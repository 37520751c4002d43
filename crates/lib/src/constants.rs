//! # Shared Constants
//!
//! Defaults and fixed names shared by the library and the CLI.

/// Name of the append-only run log written inside the output directory.
pub const LOG_FILE_NAME: &str = "pipeline.log";

/// Base URL of the Gemini REST API.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default captioning model.
pub const DEFAULT_CAPTION_MODEL: &str = "gemini-2.5-flash";

/// The default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// The default directory scanned for images.
pub const DEFAULT_INPUT_DIR: &str = "input";

/// The default directory receiving per-image JSON files and the run log.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// MIME type sent alongside every image.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Extensions recognised by discovery. Matching is exact, not case-folded.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "JPG"];
