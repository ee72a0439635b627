//! Magpie - walks a directory tree and collects per-file metadata into a
//! searchable, exportable table
//!
//! The pipeline: [`Explorer`] lists files, the [`Collector`] runs every
//! accepting [`extractor`](extractors::Extractor) against each one and
//! appends the merged record to a [`Collection`], which [`StatCalculator`],
//! [`SearchEngine`], and the export functions consume read-only.

pub mod collection;
pub mod collector;
pub mod error;
pub mod explorer;
pub mod export;
pub mod extractors;
pub mod record;
pub mod search;
pub mod stats;
pub mod value;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use collection::Collection;
pub use collector::{Collector, scan};
pub use error::{Error, Result};
pub use explorer::Explorer;
pub use export::{Delimiter, write_csv};
pub use extractors::{Extractor, default_extractors};
pub use record::Record;
pub use search::SearchEngine;
pub use stats::{StatCalculator, format_size, print_report, print_report_json};
pub use value::Value;
