//! Test utilities for building temporary scan directories.
//!
//! This module is only compiled for tests and the `test-utils` feature.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree for scan tests.
///
/// Cleaned up automatically when dropped.
pub struct ScanDir {
    dir: TempDir,
}

impl ScanDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a text file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        self.add_bytes(path, content.as_bytes())
    }

    /// Add a binary file, creating parent directories as needed.
    pub fn add_bytes(&self, path: &str, content: &[u8]) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a real PNG of the given dimensions.
    pub fn add_png(&self, path: &str, width: u32, height: u32) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        image::RgbImage::new(width, height)
            .save(&full_path)
            .expect("Failed to write png");
        full_path
    }
}

impl Default for ScanDir {
    fn default() -> Self {
        Self::new()
    }
}
