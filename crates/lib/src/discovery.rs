//! # Input Discovery
//!
//! Finds the images of a run and decides where each record is written.

use crate::constants::IMAGE_EXTENSIONS;
use crate::errors::PipelineError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An image paired with the file name of its JSON record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedImage {
    pub path: PathBuf,
    pub output_name: String,
}

/// The result of resolving output names for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPlan {
    pub images: Vec<PlannedImage>,
    /// Paths without a file name (such as `..`). These fail on their own.
    pub rejected: Vec<PathBuf>,
}

/// Lists the `.jpg`/`.JPG` files directly inside `dir`, sorted by path.
///
/// Subdirectories are not searched and other extensions (including `.jpeg`
/// and mixed-case `.Jpg`) are ignored. Symlinks to files are followed.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::InputDirMissing(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext));
        if is_image {
            images.push(path);
        }
    }
    images.sort();

    debug!("Discovered {} image(s) in '{}'", images.len(), dir.display());
    Ok(images)
}

/// The record file name for an image: its base name with `.jpg`/`.JPG`
/// replaced by `.json`.
///
/// Names that are not valid UTF-8 are converted lossily.
pub fn output_file_name(image: &Path) -> Result<String, PipelineError> {
    let base = image
        .file_name()
        .map(|name| name.to_string_lossy())
        .ok_or_else(|| PipelineError::InvalidImagePath(image.to_path_buf()))?;
    let base = base.as_ref();

    let stem = IMAGE_EXTENSIONS
        .iter()
        .find_map(|ext| base.strip_suffix(ext)?.strip_suffix('.'))
        .unwrap_or(base);

    Ok(format!("{stem}.json"))
}

/// Assigns an output name to every image.
///
/// Two images that would share an output file (`scan.jpg` and `scan.JPG`, or
/// same-named files from different directories) are rejected before anything
/// is processed. A path with no file name only rejects itself.
pub fn plan_outputs(images: &[PathBuf]) -> Result<OutputPlan, PipelineError> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    let mut plan = OutputPlan::default();

    for path in images {
        let Ok(output_name) = output_file_name(path) else {
            plan.rejected.push(path.clone());
            continue;
        };
        if let Some(first) = seen.insert(output_name.clone(), path) {
            return Err(PipelineError::OutputCollision {
                first: first.clone(),
                second: path.clone(),
                output: output_name,
            });
        }
        plan.images.push(PlannedImage {
            path: path.clone(),
            output_name,
        });
    }

    Ok(plan)
}
