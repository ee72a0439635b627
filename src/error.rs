//! Error types for magpie

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by scanning, extraction, and export.
///
/// Only [`Error::PathNotFound`] is fatal to a scan; extraction errors are
/// caught by the collector, logged, and turned into a partial record.
#[derive(Debug, Error)]
pub enum Error {
    /// The scan root does not exist or could not be resolved.
    #[error("path not found: {path}")]
    PathNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("exif error: {0}")]
    Exif(#[from] exif::Error),

    #[error("audio error: {0}")]
    Audio(#[from] lofty::error::LoftyError),

    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
