//! # Prompt Templates
//!
//! Prompts sent to the captioning model. The caption prompt can be replaced at
//! runtime through `AppConfig::caption_prompt`.

pub mod caption;

pub use caption::ARCHIVAL_CAPTION_PROMPT;
