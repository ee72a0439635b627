//! Aggregate statistics over a collection
//!
//! Pure read-only queries: counts, totals, extension histograms, and top-N
//! rankings. Records missing a numeric field contribute 0 to sums and sort
//! last in rankings; ties keep original relative order.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::collection::Collection;
use crate::extractors::image::is_image_path;
use crate::extractors::office::is_office_path;
use crate::extractors::{Extractor, PdfExtractor};
use crate::record::Record;

/// Histogram bucket for extension-less files.
pub const NO_EXTENSION: &str = "no_extension";

/// Read-only statistics over a finished [`Collection`].
pub struct StatCalculator<'a> {
    collection: &'a Collection,
}

impl<'a> StatCalculator<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self { collection }
    }

    /// Number of collected records.
    pub fn total_files(&self) -> usize {
        self.collection.len()
    }

    /// Sum of the `size` field; records without one contribute 0.
    pub fn total_size(&self) -> u64 {
        self.collection
            .iter()
            .map(|record| record.number_or_zero("size"))
            .sum::<f64>() as u64
    }

    /// File counts grouped by `extension`, with the empty-string bucket
    /// renamed to [`NO_EXTENSION`].
    pub fn count_by_extension(&self) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in self.collection {
            let ext = match record.get("extension").and_then(|v| v.as_str()) {
                Some("") | None => NO_EXTENSION,
                Some(ext) => ext,
            };
            *counts.entry(ext.to_string()).or_default() += 1;
        }
        counts
    }

    /// The `n` records with the largest `size`, descending; stable on ties.
    pub fn top_n_largest_files(&self, n: usize) -> Vec<&Record> {
        self.top_n_by(n, |record| record.number_or_zero("size"), |_| true)
    }

    /// The `n` image records with the largest pixel area (`width × height`).
    pub fn top_n_largest_images(&self, n: usize) -> Vec<&Record> {
        self.top_n_by(
            n,
            |record| record.number_or_zero("width") * record.number_or_zero("height"),
            |record| record_path_is(record, is_image_path),
        )
    }

    /// The `n` document-family records with the highest `page_count`.
    pub fn top_n_documents_by_pages(&self, n: usize) -> Vec<&Record> {
        self.top_n_by(
            n,
            |record| record.number_or_zero("page_count"),
            |record| record_path_is(record, |p| is_office_path(p) || is_pdf_path(p)),
        )
    }

    fn top_n_by(
        &self,
        n: usize,
        score: impl Fn(&Record) -> f64,
        filter: impl Fn(&Record) -> bool,
    ) -> Vec<&Record> {
        let mut ranked: Vec<&Record> = self.collection.iter().filter(|r| filter(r)).collect();
        // Stable sort keeps original relative order on equal scores.
        ranked.sort_by(|a, b| {
            score(b)
                .partial_cmp(&score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }

    /// Snapshot of the headline numbers, for JSON output.
    pub fn report(&self) -> StatsReport {
        let mut by_extension: Vec<(String, usize)> = self.count_by_extension().into_iter().collect();
        by_extension.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        StatsReport {
            total_files: self.total_files(),
            total_size: self.total_size(),
            by_extension,
        }
    }
}

fn record_path_is(record: &Record, predicate: impl Fn(&Path) -> bool) -> bool {
    record.path().is_some_and(|p| predicate(Path::new(p)))
}

fn is_pdf_path(path: &Path) -> bool {
    PdfExtractor.accepts(path)
}

/// Serializable summary of a scan.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub total_files: usize,
    pub total_size: u64,
    pub by_extension: Vec<(String, usize)>,
}

/// Format a byte count with binary units ("1.5 MB" style).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= TB {
        format!("{:.2} TB", bytes / TB)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Print a human-readable stats report to stdout with optional color.
pub fn print_report(stats: &StatCalculator<'_>, use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);

    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    stdout.set_color(&bold)?;
    writeln!(stdout, "Scan Statistics")?;
    stdout.reset()?;
    writeln!(stdout, "───────────────")?;

    writeln!(stdout, "Files:       {}", stats.total_files())?;
    writeln!(stdout, "Total size:  {}", format_size(stats.total_size()))?;
    writeln!(stdout)?;

    let report = stats.report();
    if !report.by_extension.is_empty() {
        stdout.set_color(&bold)?;
        writeln!(stdout, "By extension:")?;
        stdout.reset()?;

        let mut ext_color = ColorSpec::new();
        ext_color.set_fg(Some(Color::Cyan));
        for (ext, count) in &report.by_extension {
            write!(stdout, "  ")?;
            stdout.set_color(&ext_color)?;
            write!(stdout, "{:<14}", ext)?;
            stdout.reset()?;
            writeln!(stdout, "{:>5} files", count)?;
        }
        writeln!(stdout)?;
    }

    let largest = stats.top_n_largest_files(10);
    if !largest.is_empty() {
        stdout.set_color(&bold)?;
        writeln!(stdout, "Largest files:")?;
        stdout.reset()?;
        for record in largest {
            writeln!(
                stdout,
                "  {:>10}  {}",
                format_size(record.number_or_zero("size") as u64),
                record.path().unwrap_or("?")
            )?;
        }
    }

    Ok(())
}

/// Print the stats summary as JSON.
pub fn print_report_json(stats: &StatCalculator<'_>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&stats.report()).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn record(path: &str, pairs: &[(&str, Value)]) -> Record {
        let mut r = Record::with_path(path);
        for (k, v) in pairs {
            r.insert(*k, v.clone());
        }
        r
    }

    fn sized(path: &str, size: i64) -> Record {
        record(path, &[("size", Value::Int(size))])
    }

    #[test]
    fn test_total_files_empty() {
        let collection = Collection::new();
        assert_eq!(StatCalculator::new(&collection).total_files(), 0);
        assert_eq!(StatCalculator::new(&collection).total_size(), 0);
    }

    #[test]
    fn test_total_size_missing_counts_as_zero() {
        let mut collection = Collection::new();
        collection.push(sized("a", 100));
        collection.push(record("b", &[])); // no size field
        collection.push(sized("c", 50));

        assert_eq!(StatCalculator::new(&collection).total_size(), 150);
    }

    #[test]
    fn test_count_by_extension_renames_empty_bucket() {
        let mut collection = Collection::new();
        for ext in [".txt", ".txt", "", ".csv"] {
            collection.push(record("x", &[("extension", Value::Text(ext.into()))]));
        }

        let counts = StatCalculator::new(&collection).count_by_extension();
        assert_eq!(counts.get(".txt"), Some(&2));
        assert_eq!(counts.get(NO_EXTENSION), Some(&1));
        assert_eq!(counts.get(".csv"), Some(&1));
        assert!(!counts.contains_key(""));
    }

    #[test]
    fn test_count_by_extension_tolerates_missing_field() {
        let mut collection = Collection::new();
        collection.push(record("x", &[]));
        let counts = StatCalculator::new(&collection).count_by_extension();
        assert_eq!(counts.get(NO_EXTENSION), Some(&1));
    }

    #[test]
    fn test_top_n_largest_files() {
        let mut collection = Collection::new();
        collection.push(sized("a", 10));
        collection.push(sized("b", 30));
        collection.push(sized("c", 20));

        let stats = StatCalculator::new(&collection);
        let top: Vec<&str> = stats
            .top_n_largest_files(2)
            .iter()
            .map(|r| r.path().unwrap())
            .collect();
        assert_eq!(top, vec!["b", "c"]);
    }

    #[test]
    fn test_top_n_ties_keep_original_order() {
        let mut collection = Collection::new();
        collection.push(sized("first", 10));
        collection.push(sized("second", 10));
        collection.push(record("no-size", &[]));

        let stats = StatCalculator::new(&collection);
        let top: Vec<&str> = stats
            .top_n_largest_files(3)
            .iter()
            .map(|r| r.path().unwrap())
            .collect();
        assert_eq!(top, vec!["first", "second", "no-size"]);
    }

    #[test]
    fn test_top_n_largest_images_filters_by_path() {
        let mut collection = Collection::new();
        collection.push(record(
            "big.png",
            &[("width", Value::Int(100)), ("height", Value::Int(100))],
        ));
        collection.push(record(
            "small.jpg",
            &[("width", Value::Int(10)), ("height", Value::Int(10))],
        ));
        collection.push(sized("huge.txt", 999_999));

        let stats = StatCalculator::new(&collection);
        let top: Vec<&str> = stats
            .top_n_largest_images(5)
            .iter()
            .map(|r| r.path().unwrap())
            .collect();
        assert_eq!(top, vec!["big.png", "small.jpg"]);
    }

    #[test]
    fn test_top_n_documents_by_pages() {
        let mut collection = Collection::new();
        collection.push(record("a.pdf", &[("page_count", Value::Int(5))]));
        collection.push(record("b.docx", &[("page_count", Value::Int(12))]));
        collection.push(record("c.doc", &[])); // no page count: ranks last
        collection.push(record("d.txt", &[("page_count", Value::Int(99))]));

        let stats = StatCalculator::new(&collection);
        let top: Vec<&str> = stats
            .top_n_documents_by_pages(10)
            .iter()
            .map(|r| r.path().unwrap())
            .collect();
        assert_eq!(top, vec!["b.docx", "a.pdf", "c.doc"]);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
    }
}
