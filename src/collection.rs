//! The scan result: ordered records plus the key registry
//!
//! No two records need share a field set, so serializers cannot take column
//! order from any single record. The collection tracks the union of all keys
//! ever appended, in first-seen order, independent of which records actually
//! carry each key.

use std::collections::HashSet;

use serde::Serialize;

use crate::record::Record;

/// An ordered, heterogeneous sequence of [`Record`]s with an append-only
/// key registry.
///
/// The registry is order-stable: once a key is registered at a position it
/// never moves, and re-appending records with already-seen keys leaves it
/// unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Collection {
    records: Vec<Record>,
    #[serde(skip)]
    keys: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, registering any field names not seen before in the
    /// record's own field order.
    pub fn push(&mut self, record: Record) {
        for key in record.keys() {
            if self.seen.insert(key.to_string()) {
                self.keys.push(key.to_string());
            }
        }
        self.records.push(record);
    }

    /// All field names ever appended, in first-insertion order. This is the
    /// authoritative column order for tabular export.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the whole collection as a JSON array of objects.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for record in iter {
            collection.push(record);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut r = Record::new();
        for (k, v) in pairs {
            r.insert(*k, *v);
        }
        r
    }

    #[test]
    fn test_registry_first_seen_order() {
        let mut c = Collection::new();
        c.push(record(&[("path", "a"), ("size", "1")]));
        c.push(record(&[("path", "b"), ("width", "10"), ("size", "2")]));
        assert_eq!(c.keys(), &["path", "size", "width"]);
    }

    #[test]
    fn test_registry_stable_under_reappend() {
        let mut c = Collection::new();
        c.push(record(&[("path", "a"), ("size", "1")]));
        let before = c.keys().to_vec();
        // Only already-seen keys: registry must not change.
        c.push(record(&[("size", "2"), ("path", "b")]));
        assert_eq!(c.keys(), &before[..]);
    }

    #[test]
    fn test_empty_collection() {
        let c = Collection::new();
        assert_eq!(c.len(), 0);
        assert!(c.is_empty());
        assert!(c.keys().is_empty());
    }

    #[test]
    fn test_to_json_is_array_of_objects() {
        let mut c = Collection::new();
        c.push(record(&[("path", "a"), ("size", "1")]));
        let json = c.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["path"], "a");
    }

    #[test]
    fn test_from_iterator_rederives_registry() {
        let mut c = Collection::new();
        c.push(record(&[("path", "a"), ("size", "1")]));
        c.push(record(&[("path", "b"), ("width", "10")]));

        let filtered: Collection = c
            .iter()
            .filter(|r| r.get("width").is_some())
            .cloned()
            .collect();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.keys(), &["path", "width"]);
    }
}
