//! Pluggable metadata extractors
//!
//! Each extractor recognizes one category of file by extension and produces
//! a flat fragment of named scalars. The collector runs every accepting
//! extractor against a file and merges the fragments in list order.
//!
//! # Field namespacing
//!
//! Extractors own disjoint key sets, and the merge policy ("later extractor
//! wins on collision") is therefore never exercised by the default set:
//!
//! - `basic` owns `name`, `extension`, `size`, `modified`, `created`
//! - `image` owns `width`, `height`, `xres`, `yres` and `exif:`-prefixed tags
//! - `audio` owns tag and stream-property fields
//! - `pdf` owns `page_count` and `pdf_`-prefixed timestamps
//! - `office` renames its `created`/`modified` to `office_created`/
//!   `office_modified` so they never shadow the filesystem timestamps
//!
//! A new extractor must document its keys here and pick names (or a prefix)
//! that do not collide with the above.

pub mod audio;
pub mod basic;
pub mod image;
pub mod office;
pub mod pdf;

use std::path::Path;

pub use audio::AudioExtractor;
pub use basic::BasicExtractor;
pub use image::ImageExtractor;
pub use office::{LegacyOfficeExtractor, OpenXmlOfficeExtractor};
pub use pdf::PdfExtractor;

use crate::error::Result;
use crate::record::Record;

/// Base trait for all metadata extractors.
pub trait Extractor {
    /// A short name for logs and error reports (e.g. "image", "pdf").
    fn name(&self) -> &'static str;

    /// Whether this extractor recognizes the file.
    ///
    /// Must be a pure, fast predicate over the path (typically the
    /// extension) and must not open the file.
    fn accepts(&self, path: &Path) -> bool;

    /// Open and parse the file, producing a fragment of named scalars.
    ///
    /// May fail on corrupt or unreadable input; the collector isolates such
    /// failures per extractor, so an error here never costs the whole record.
    fn extract(&self, path: &Path) -> Result<Record>;
}

/// The default extractor list, in dispatch order.
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(BasicExtractor),
        Box::new(ImageExtractor),
        Box::new(AudioExtractor),
        Box::new(PdfExtractor),
        Box::new(OpenXmlOfficeExtractor),
        Box::new(LegacyOfficeExtractor),
    ]
}

/// Lowercased extension including the dot, or "" for extension-less files.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b/photo.JPG")), ".jpg");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
    }

    #[test]
    fn test_default_extractors_have_unique_names() {
        let extractors = default_extractors();
        let mut names: Vec<&str> = extractors.iter().map(|e| e.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), extractors.len());
    }
}
