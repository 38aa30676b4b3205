// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discrete memory extraction.
//!
//! Turns raw message records into episodic and semantic long-term memories.
//! A run selects its input, asks the generation model about every record,
//! and only then writes back: one `update_memories` flipping the extraction
//! flag of every processed record, followed by one indexing call with the
//! new memories. If any record exhausts its attempts the run aborts before
//! either write.

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use mnemo_core::types::{MemoryRecord, MemoryType, SearchQuery};
use mnemo_core::{ChatProvider, ChatRequest, MemoryIndexer, MnemoError, StorageAdapter};
use mnemo_resilience::{RetryPolicy, retry};
use mnemo_router::ClientCache;
use tracing::{debug, info, warn};

use crate::prompts::discrete_extraction_prompt;
use crate::types::{DiscreteExtractionReport, ExtractedMemory, ExtractionPolicy, MemoriesEnvelope};

/// Tunables for one extractor.
#[derive(Debug, Clone)]
pub struct DiscreteSettings {
    pub model: String,
    pub top_k_topics: usize,
    pub page_size: usize,
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

enum RecordOutcome {
    Deleted,
    Extracted {
        source: MemoryRecord,
        memories: Vec<ExtractedMemory>,
    },
}

pub struct DiscreteExtractor {
    clients: Arc<ClientCache>,
    storage: Arc<dyn StorageAdapter>,
    indexer: Arc<dyn MemoryIndexer>,
    settings: DiscreteSettings,
}

impl DiscreteExtractor {
    pub fn new(
        clients: Arc<ClientCache>,
        storage: Arc<dyn StorageAdapter>,
        indexer: Arc<dyn MemoryIndexer>,
        settings: DiscreteSettings,
    ) -> Self {
        Self {
            clients,
            storage,
            indexer,
            settings,
        }
    }

    pub fn policy(&self) -> ExtractionPolicy {
        ExtractionPolicy::DISCRETE
    }

    /// Runs extraction over `records`, or over every unprocessed message in
    /// storage when `records` is `None` or empty.
    pub async fn run(
        &self,
        records: Option<Vec<MemoryRecord>>,
        deduplicate: bool,
    ) -> Result<DiscreteExtractionReport, MnemoError> {
        let records = match records {
            Some(records) if !records.is_empty() => records,
            _ => self.select_unprocessed().await?,
        };
        if records.is_empty() {
            debug!("no records to extract from");
            return Ok(DiscreteExtractionReport::default());
        }

        let client = self.clients.get_client_for_model(&self.settings.model).await?;

        let outcomes: Vec<RecordOutcome> = stream::iter(records)
            .map(|record| self.process(Arc::clone(&client), record))
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await?;

        let mut report = DiscreteExtractionReport::default();
        let mut updated = Vec::new();
        let mut created = Vec::new();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Deleted => report.deleted += 1,
                RecordOutcome::Extracted { source, memories } => {
                    updated.push(source.marked_extracted());
                    created.extend(memories.into_iter().map(ExtractedMemory::into_record));
                }
            }
        }
        report.processed = updated.len();
        report.created = created.len();

        if !updated.is_empty() {
            self.storage.update_memories(updated).await?;
        }
        if !created.is_empty() {
            self.indexer
                .index_long_term_memories(created, deduplicate)
                .await?;
        }

        info!(
            processed = report.processed,
            deleted = report.deleted,
            created = report.created,
            "discrete memory extraction finished"
        );
        Ok(report)
    }

    /// Pages through unprocessed messages until a short page comes back.
    pub async fn select_unprocessed(&self) -> Result<Vec<MemoryRecord>, MnemoError> {
        let page_size = self.settings.page_size.max(1);
        let mut selected = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .storage
                .search_memories(SearchQuery {
                    text: String::new(),
                    memory_type: Some(MemoryType::Message),
                    discrete_memory_extracted: Some(false),
                    limit: page_size,
                    offset,
                })
                .await?;

            let found = page.memories.len();
            info!(
                found,
                offset,
                ids = ?page.memories.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
                "found memories to extract"
            );
            selected.extend(page.memories);

            if found < page_size {
                break;
            }
            offset += page_size;
        }

        Ok(selected)
    }

    async fn process(
        &self,
        client: Arc<dyn ChatProvider>,
        record: MemoryRecord,
    ) -> Result<RecordOutcome, MnemoError> {
        if record.text.is_empty() {
            info!(id = %record.id, "deleting memory with no text");
            self.storage.delete_memories(vec![record.id]).await?;
            return Ok(RecordOutcome::Deleted);
        }

        let prompt = discrete_extraction_prompt(&record.text, self.settings.top_k_topics);
        let envelope = retry(&self.settings.retry, MnemoError::is_retriable, |attempt| {
            let client = Arc::clone(&client);
            let request = ChatRequest::new(&self.settings.model, prompt.clone()).json_object();
            let id = record.id.as_str();
            async move {
                let response = client.create_chat_completion(request).await?;
                let content = response.content().unwrap_or_default();
                MemoriesEnvelope::parse(content).inspect_err(|e| {
                    warn!(attempt, id, error = %e, content, "invalid extraction reply");
                })
            }
        })
        .await?;

        debug!(id = %record.id, memories = envelope.memories.len(), "extracted memories");
        Ok(RecordOutcome::Extracted {
            source: record,
            memories: envelope.memories,
        })
    }
}
