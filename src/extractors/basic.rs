//! Filesystem attributes, emitted for every file

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::extractors::{Extractor, extension_of};
use crate::record::Record;
use crate::value::Value;

/// Always accepts. Emits `name`, `extension`, `size`, `modified`, `created`.
///
/// `created` is `Null` on filesystems that do not record a birth time.
pub struct BasicExtractor;

impl Extractor for BasicExtractor {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn accepts(&self, _path: &Path) -> bool {
        true
    }

    fn extract(&self, path: &Path) -> Result<Record> {
        let meta = path.metadata()?;

        let mut record = Record::new();
        record.insert(
            "name",
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
        record.insert("extension", extension_of(path));
        record.insert("size", meta.len());
        record.insert("modified", meta.modified().map(format_timestamp)?);
        record.insert(
            "created",
            meta.created()
                .map(format_timestamp)
                .map(Value::Text)
                .unwrap_or(Value::Null),
        );
        Ok(record)
    }
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_accepts_everything() {
        assert!(BasicExtractor.accepts(Path::new("anything.xyz")));
        assert!(BasicExtractor.accepts(Path::new("no_extension")));
    }

    #[test]
    fn test_basic_fields() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Notes.TXT");
        fs::write(&file, "hello").unwrap();

        let record = BasicExtractor.extract(&file).unwrap();
        assert_eq!(record.get("name"), Some(&Value::Text("Notes.TXT".into())));
        assert_eq!(record.get("extension"), Some(&Value::Text(".txt".into())));
        assert_eq!(record.get("size"), Some(&Value::Int(5)));

        let modified = record.get("modified").and_then(Value::as_str).unwrap();
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(modified.len(), 19);
        assert_eq!(&modified[4..5], "-");
    }

    #[test]
    fn test_extensionless_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Makefile");
        fs::write(&file, "all:").unwrap();

        let record = BasicExtractor.extract(&file).unwrap();
        assert_eq!(record.get("extension"), Some(&Value::Text("".into())));
    }
}
