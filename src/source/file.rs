//! File-based import source.
//!
//! Polls a JSON import document on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::warn;

use super::{ImportDocument, ImportSource};

/// An import source that reads a JSON document from a file.
///
/// The source tracks the file's modification time and only returns a new
/// document when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<ImportDocument> {
        let result = match fs::read_to_string(&self.path) {
            Ok(content) => ImportDocument::from_json(&content)
                .map_err(|e| format!("Parse error: {}", e)),
            Err(e) => Err(format!("Read error: {}", e)),
        };

        match result {
            Ok(document) => {
                self.last_error = None;
                Some(document)
            }
            Err(message) => {
                warn!(source = %self.description, error = %message, "import failed");
                self.last_error = Some(message);
                None
            }
        }
    }
}

impl ImportSource for FileSource {
    fn poll(&mut self) -> Option<ImportDocument> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(document) = self.read_file() {
                self.last_modified = current_modified;
                return Some(document);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "tilt": {
                "points": [ { "name": "TL-01" } ],
                "observations": [
                    { "point": "TL-01", "timestamp": "2024-01-10", "reading": { "x": 0.1, "y": 0.2 } }
                ]
            }
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/monitoring.json");
        assert_eq!(source.path(), Path::new("/tmp/monitoring.json"));
        assert_eq!(source.description(), "file: /tmp/monitoring.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let document = source.poll().unwrap();
        assert_eq!(document.tilt.points[0].name, "TL-01");
        assert_eq!(document.tilt.observations.len(), 1);

        // Unchanged file yields nothing new
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        writeln!(file, r#"{{ "tilt": {{ "points": [ {{ "name": "TL-02" }} ] }} }}"#).unwrap();
        file.flush().unwrap();

        // May not fire on filesystems with coarse mtime resolution
        if let Some(document) = source.poll() {
            assert_eq!(document.tilt.points[0].name, "TL-02");
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/monitoring.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_incompatible_version() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "version": {{ "major": 9 }} }}"#).unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("schema version"));
    }
}
