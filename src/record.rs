//! Per-file metadata records
//!
//! A record is the flat set of named values describing one discovered file.
//! Field order is insertion order; the collection's key registry depends on
//! it, so the map must be order-preserving.

use indexmap::IndexMap;
use serde::Serialize;

use crate::value::Value;

/// An ordered mapping from field name to scalar value for one file.
///
/// Records are sparse: apart from `path`, a field is present only when some
/// accepting extractor emitted it. A missing field means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record seeded with its root-relative `path` field.
    pub fn with_path(path: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.insert("path", path.into());
        record
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `path` field, present on every collected record.
    pub fn path(&self) -> Option<&str> {
        self.get("path").and_then(Value::as_str)
    }

    /// Numeric view of a field, defaulting to 0.0 when absent or non-numeric.
    ///
    /// This is the aggregation convention: unknown sizes and counts weigh
    /// nothing when summing or ranking.
    pub fn number_or_zero(&self, key: &str) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Merge another record's fields into this one, in its field order.
    /// Colliding keys take the incoming value.
    pub fn merge(&mut self, fragment: Record) {
        self.fields.extend(fragment.fields);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut record = Record::with_path("a/b.txt");
        record.insert("size", 10u64);
        record.insert("name", "b.txt");
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["path", "size", "name"]);
    }

    #[test]
    fn test_merge_later_wins() {
        let mut record = Record::with_path("x");
        record.insert("title", "from basic");

        let mut fragment = Record::new();
        fragment.insert("title", "from pdf");
        fragment.insert("page_count", 3u64);
        record.merge(fragment);

        assert_eq!(record.get("title"), Some(&Value::Text("from pdf".into())));
        assert_eq!(record.get("page_count"), Some(&Value::Int(3)));
        // Overwriting must not move the key.
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["path", "title", "page_count"]);
    }

    #[test]
    fn test_number_or_zero() {
        let mut record = Record::new();
        record.insert("size", 100u64);
        record.insert("name", "x");
        assert_eq!(record.number_or_zero("size"), 100.0);
        assert_eq!(record.number_or_zero("missing"), 0.0);
        assert_eq!(record.number_or_zero("name"), 0.0);
    }
}
