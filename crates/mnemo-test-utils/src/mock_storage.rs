// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter and indexer that record every call.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use mnemo_core::MnemoError;
use mnemo_core::traits::{MemoryIndexer, PluginAdapter, StorageAdapter};
use mnemo_core::types::{AdapterType, HealthStatus, MemoryRecord, SearchPage, SearchQuery};

/// A `Vec`-backed store implementing both [`StorageAdapter`] and [`MemoryIndexer`].
///
/// Search applies the type and flag filters, then `offset`/`limit`. Indexed
/// records are kept apart from the searchable store so tests can tell
/// updates and inserts apart.
#[derive(Default)]
pub struct InMemoryStorage {
    records: Mutex<Vec<MemoryRecord>>,
    searches: Mutex<Vec<SearchQuery>>,
    updates: Mutex<Vec<Vec<MemoryRecord>>>,
    deletes: Mutex<Vec<Vec<String>>>,
    indexed: Mutex<Vec<(Vec<MemoryRecord>, bool)>>,
    fail_search: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = MemoryRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make every subsequent search fail with a storage error.
    pub fn fail_searches(&self) {
        self.fail_search.store(true, Ordering::SeqCst);
    }

    /// Current contents of the searchable store.
    pub async fn records(&self) -> Vec<MemoryRecord> {
        self.records.lock().await.clone()
    }

    pub async fn search_calls(&self) -> Vec<SearchQuery> {
        self.searches.lock().await.clone()
    }

    /// Batches passed to `update_memories`, one entry per call.
    pub async fn update_calls(&self) -> Vec<Vec<MemoryRecord>> {
        self.updates.lock().await.clone()
    }

    /// Id batches passed to `delete_memories`, one entry per call.
    pub async fn delete_calls(&self) -> Vec<Vec<String>> {
        self.deletes.lock().await.clone()
    }

    /// `(records, deduplicate)` for each `index_long_term_memories` call.
    pub async fn index_calls(&self) -> Vec<(Vec<MemoryRecord>, bool)> {
        self.indexed.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for InMemoryStorage {
    fn name(&self) -> &str {
        "in-memory-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for InMemoryStorage {
    async fn search_memories(&self, query: SearchQuery) -> Result<SearchPage, MnemoError> {
        self.searches.lock().await.push(query.clone());
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(MnemoError::Storage {
                source: Box::new(std::io::Error::other("search backend unavailable")),
            });
        }

        let records = self.records.lock().await;
        let matching: Vec<&MemoryRecord> = records
            .iter()
            .filter(|r| query.memory_type.is_none_or(|t| r.memory_type == t))
            .filter(|r| {
                query
                    .discrete_memory_extracted
                    .is_none_or(|f| r.discrete_memory_extracted == f)
            })
            .collect();

        Ok(SearchPage {
            total: matching.len(),
            memories: matching
                .into_iter()
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect(),
        })
    }

    async fn update_memories(&self, records: Vec<MemoryRecord>) -> Result<(), MnemoError> {
        self.updates.lock().await.push(records.clone());
        let mut stored = self.records.lock().await;
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }
        Ok(())
    }

    async fn delete_memories(&self, ids: Vec<String>) -> Result<(), MnemoError> {
        self.deletes.lock().await.push(ids.clone());
        self.records.lock().await.retain(|r| !ids.contains(&r.id));
        Ok(())
    }
}

#[async_trait]
impl MemoryIndexer for InMemoryStorage {
    async fn index_long_term_memories(
        &self,
        records: Vec<MemoryRecord>,
        deduplicate: bool,
    ) -> Result<(), MnemoError> {
        self.indexed.lock().await.push((records, deduplicate));
        Ok(())
    }
}
