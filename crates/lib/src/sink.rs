//! # Output Sink
//!
//! Writes per-image JSON records and the run log into the output directory.

use crate::constants::LOG_FILE_NAME;
use crate::errors::PipelineError;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The output directory of a run.
///
/// The directory is created on first use.
#[derive(Debug, Clone)]
pub struct OutputSink {
    dir: PathBuf,
}

impl OutputSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    fn ensure_dir(&self) -> Result<(), PipelineError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Serializes `record` as UTF-8 JSON with 4-space indentation and writes
    /// it to `<dir>/<file_name>`, replacing any previous file.
    ///
    /// Non-ASCII text is written as-is, not escaped.
    pub fn write_record<T: Serialize>(
        &self,
        file_name: &str,
        record: &T,
    ) -> Result<PathBuf, PipelineError> {
        self.ensure_dir()?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record.serialize(&mut serializer)?;

        let path = self.dir.join(file_name);
        fs::write(&path, buf)?;
        info!("Saved: {}", path.display());
        Ok(path)
    }

    /// Appends `[<timestamp>] <message>` to the run log.
    pub fn log(&self, message: &str) -> Result<(), PipelineError> {
        self.ensure_dir()?;

        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())?;
        writeln!(file, "[{timestamp}] {message}")?;
        debug!("run log: {message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_write_record_creates_dir_and_indents() {
        let root = tempdir().unwrap();
        let sink = OutputSink::new(root.path().join("output"));

        let path = sink
            .write_record("a.json", &json!({"caption": "Café in Zürich"}))
            .unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "{\n    \"caption\": \"Café in Zürich\"\n}");
    }

    #[test]
    fn test_write_record_overwrites() {
        let root = tempdir().unwrap();
        let sink = OutputSink::new(root.path());
        sink.write_record("a.json", &json!({"v": 1})).unwrap();
        sink.write_record("a.json", &json!({"v": 2})).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.path().join("a.json")).unwrap())
                .unwrap();
        assert_eq!(value["v"], 2);
    }

    #[test]
    fn test_log_appends_timestamped_lines() {
        let root = tempdir().unwrap();
        let sink = OutputSink::new(root.path());
        sink.log("Processing input/a.jpg...").unwrap();
        sink.log("Completed input/a.jpg").unwrap();

        let content = fs::read_to_string(sink.log_path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] Processing input/a.jpg..."));
        assert!(lines[1].ends_with("] Completed input/a.jpg"));

        let stamp = &lines[0][1..lines[0].find(']').unwrap()];
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    }
}
