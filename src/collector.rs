//! Scan driver: walk, dispatch, merge, append

use std::path::Path;

use tracing::{debug, warn};

use crate::collection::Collection;
use crate::error::Result;
use crate::explorer::Explorer;
use crate::extractors::Extractor;
use crate::record::Record;

/// Observational per-file progress callback. Invoked once per processed
/// file; must not affect ordering or results.
pub type ProgressFn<'a> = Box<dyn FnMut(&Path) + 'a>;

/// Drives a scan: drains the [`Explorer`]'s file sequence, dispatches each
/// file to every accepting extractor, merges the fragments into one record
/// per file (later extractors win key collisions), and appends to the
/// collection.
///
/// A failing extractor is isolated: its error is logged and its keys are
/// simply absent from that record. One corrupt file never loses the scan.
pub struct Collector<'a> {
    explorer: Explorer,
    extractors: Vec<Box<dyn Extractor>>,
    collection: Collection,
    on_progress: Option<ProgressFn<'a>>,
}

impl std::fmt::Debug for Collector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("explorer", &self.explorer)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl<'a> Collector<'a> {
    /// Create a collector for `root` with an ordered extractor list.
    /// Fails fast if the root does not exist.
    pub fn new(root: impl AsRef<Path>, extractors: Vec<Box<dyn Extractor>>) -> Result<Self> {
        Ok(Self {
            explorer: Explorer::new(root)?,
            extractors,
            collection: Collection::new(),
            on_progress: None,
        })
    }

    pub fn add_extractor(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    /// Install a progress callback, invoked once per visited file.
    pub fn on_progress(mut self, callback: impl FnMut(&Path) + 'a) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Walk the tree and build the collection.
    pub fn collect(&mut self) -> &Collection {
        let root = self.explorer.root().to_path_buf();
        for file in self.explorer.files() {
            if let Some(callback) = &mut self.on_progress {
                callback(&file);
            }
            let record = build_record(&root, &file, &self.extractors);
            self.collection.push(record);
        }
        &self.collection
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Hand the finished collection to its read-only consumers.
    pub fn into_collection(self) -> Collection {
        self.collection
    }

    pub fn root(&self) -> &Path {
        self.explorer.root()
    }
}

fn build_record(root: &Path, file: &Path, extractors: &[Box<dyn Extractor>]) -> Record {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut record = Record::with_path(relative.to_string_lossy());

    for extractor in extractors {
        if !extractor.accepts(file) {
            continue;
        }
        match extractor.extract(file) {
            Ok(fragment) => record.merge(fragment),
            Err(err) => {
                warn!(
                    extractor = extractor.name(),
                    path = %file.display(),
                    error = %err,
                    "extraction failed, keeping partial record"
                );
            }
        }
    }
    debug!(path = %relative.display(), fields = record.len(), "collected");
    record
}

/// Convenience: scan `root` with the given extractors and return the
/// collection.
pub fn scan(root: impl AsRef<Path>, extractors: Vec<Box<dyn Extractor>>) -> Result<Collection> {
    let mut collector = Collector::new(root, extractors)?;
    collector.collect();
    Ok(collector.into_collection())
}
