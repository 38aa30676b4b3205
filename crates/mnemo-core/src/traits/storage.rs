// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage-facing traits consumed by the extraction pipeline.
//!
//! The pipeline never retries these calls; failures propagate unmodified.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MemoryRecord, SearchPage, SearchQuery};

/// Narrow view of the long-term memory store.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Returns one page of records matching the query filters.
    async fn search_memories(&self, query: SearchQuery) -> Result<SearchPage, MnemoError>;

    /// Replaces the stored copies of `records` (matched by id).
    async fn update_memories(&self, records: Vec<MemoryRecord>) -> Result<(), MnemoError>;

    /// Deletes records by id.
    async fn delete_memories(&self, ids: Vec<String>) -> Result<(), MnemoError>;
}

/// Inserts new long-term memories, optionally suppressing near-duplicates.
#[async_trait]
pub trait MemoryIndexer: PluginAdapter {
    async fn index_long_term_memories(
        &self,
        records: Vec<MemoryRecord>,
        deduplicate: bool,
    ) -> Result<(), MnemoError>;
}
