//! Free-text search over a collection
//!
//! Built from a frozen collection snapshot. Construction tokenizes every
//! stringified field value into a word-level inverted index; `search` does a
//! case-insensitive substring scan (substrings cannot be answered from a
//! word index), while `search_token` answers exact-token queries straight
//! from the index.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;

use crate::collection::Collection;

/// Inverted-index search over one collection.
pub struct SearchEngine<'a> {
    collection: &'a Collection,
    index: HashMap<String, BTreeSet<usize>>,
}

impl<'a> SearchEngine<'a> {
    /// Index the collection. Cost is linear in the total text length of all
    /// field values.
    pub fn new(collection: &'a Collection) -> Self {
        let index = build_index(collection);
        Self { collection, index }
    }

    /// Case-insensitive substring search across all field values.
    ///
    /// Returns a new collection holding clones of the matching records, in
    /// their original relative order.
    pub fn search(&self, query: &str) -> Collection {
        let query = query.to_lowercase();
        self.collection
            .iter()
            .filter(|record| {
                record
                    .values()
                    .any(|value| value.to_string().to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }

    /// Exact word-token lookup through the inverted index.
    ///
    /// Matches records containing `token` as a whole word in any field;
    /// faster than [`search`](Self::search) but never matches partial words.
    pub fn search_token(&self, token: &str) -> Collection {
        match self.index.get(&token.to_lowercase()) {
            Some(positions) => positions
                .iter()
                .filter_map(|&i| self.collection.get(i))
                .cloned()
                .collect(),
            None => Collection::new(),
        }
    }

    /// Number of distinct tokens in the index.
    pub fn token_count(&self) -> usize {
        self.index.len()
    }
}

fn build_index(collection: &Collection) -> HashMap<String, BTreeSet<usize>> {
    // \w+ over the lowercased text, the same token shape a caller would
    // naturally type.
    let word = Regex::new(r"\w+").expect("static regex");
    let mut index: HashMap<String, BTreeSet<usize>> = HashMap::new();
    for (position, record) in collection.iter().enumerate() {
        for value in record.values() {
            let text = value.to_string().to_lowercase();
            for token in word.find_iter(&text) {
                index
                    .entry(token.as_str().to_string())
                    .or_default()
                    .insert(position);
            }
        }
    }
    index
}
