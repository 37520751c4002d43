//! # Response Normalizer
//!
//! Generative models wrap JSON in markdown fences often enough, even when told
//! not to, that every caption response passes through here before parsing.

use crate::errors::GatewayError;

const FENCE: &str = "```";

/// Removes one leading and one trailing code fence from `text`.
///
/// The leading fence may carry a language tag (` ```json `) and a newline.
/// Whitespace is trimmed before and after each removal. Text without fences
/// comes back trimmed and otherwise untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();

    if let Some(rest) = cleaned.strip_prefix(FENCE) {
        let tag_end = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && !matches!(c, '_' | '-' | '+'))
            .unwrap_or(rest.len());
        let rest = &rest[tag_end..];
        cleaned = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    cleaned = cleaned.trim();
    if let Some(rest) = cleaned.strip_suffix(FENCE) {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Normalizes a caption response.
///
/// Successful responses have their fences stripped. A gateway error is passed
/// through unchanged so the schema stage can turn it into an error record; this
/// function never fails on its own.
pub fn clean_model_response(raw: &Result<String, GatewayError>) -> Result<&str, &GatewayError> {
    match raw {
        Ok(text) => Ok(strip_code_fences(text)),
        Err(e) => Err(e),
    }
}
