// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-lifetime caches for local-model extraction results.
//!
//! Entries are never evicted.

use dashmap::DashMap;
use sha2::{Digest, Sha256};

/// Topic and entity results keyed by their inputs.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    topics: DashMap<(String, usize), Vec<String>>,
    entities: DashMap<String, Vec<String>>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topics(&self, text: &str, count: usize) -> Option<Vec<String>> {
        self.topics
            .get(&(text.to_string(), count))
            .map(|entry| entry.value().clone())
    }

    pub fn store_topics(&self, text: &str, count: usize, topics: Vec<String>) {
        self.topics.insert((text.to_string(), count), topics);
    }

    pub fn entities(&self, text: &str) -> Option<Vec<String>> {
        self.entities
            .get(&entity_key(text))
            .map(|entry| entry.value().clone())
    }

    pub fn store_entities(&self, text: &str, entities: Vec<String>) {
        self.entities.insert(entity_key(text), entities);
    }

    /// Number of cached `(text, count)` topic results.
    pub fn topic_entries(&self) -> usize {
        self.topics.len()
    }

    pub fn entity_entries(&self) -> usize {
        self.entities.len()
    }
}

/// Hex SHA-256 of the text.
pub fn entity_key(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_key_is_sha256_hex() {
        assert_eq!(
            entity_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn topic_keys_include_count() {
        let cache = ExtractionCache::new();
        cache.store_topics("rust is fast", 2, vec!["rust".into()]);
        assert_eq!(cache.topics("rust is fast", 2), Some(vec!["rust".into()]));
        assert_eq!(cache.topics("rust is fast", 3), None);
        assert_eq!(cache.topic_entries(), 1);
    }

    #[test]
    fn empty_results_are_cached_hits() {
        let cache = ExtractionCache::new();
        cache.store_entities("nothing here", Vec::new());
        assert_eq!(cache.entities("nothing here"), Some(Vec::new()));
        assert_eq!(cache.entity_entries(), 1);
    }
}
