// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The extraction pipeline context.
//!
//! Owns every piece of shared state the extractors need: provider clients,
//! lazily loaded local models and result caches. Nothing lives in globals, so
//! two pipelines never share a cache or a model.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use mnemo_config::{MnemoConfig, TopicModelSource};
use mnemo_core::types::MemoryRecord;
use mnemo_core::{MemoryIndexer, MnemoError, StorageAdapter, TokenClassifier, TopicModel};
use mnemo_resilience::RetryPolicy;
use mnemo_router::ClientCache;
use tracing::{debug, info};

use crate::cache::ExtractionCache;
use crate::discrete::{DiscreteExtractor, DiscreteSettings};
use crate::embedder::{OnnxEmbedder, SentenceEmbedder};
use crate::entities::{EntityExtractor, dedupe_preserving_order};
use crate::lazy::{LazyModel, ModelLoader};
use crate::model_manager::ModelManager;
use crate::ner::OnnxTokenClassifier;
use crate::topic_model::CentroidTopicModel;
use crate::topics::{LlmTopics, StatisticalTopics, TopicExtractor};
use crate::types::DiscreteExtractionReport;

/// Storage and indexer backing discrete extraction.
#[derive(Clone)]
struct StorageHandles {
    storage: Arc<dyn StorageAdapter>,
    indexer: Arc<dyn MemoryIndexer>,
}

pub struct ExtractionPipeline {
    config: Arc<MnemoConfig>,
    clients: Arc<ClientCache>,
    cache: Arc<ExtractionCache>,
    topics: TopicExtractor,
    entities: EntityExtractor,
    storage: Option<StorageHandles>,
}

impl ExtractionPipeline {
    /// Builds the pipeline described by `config`. Local models are not loaded
    /// (or downloaded) until first used.
    pub fn new(config: Arc<MnemoConfig>, clients: Arc<ClientCache>) -> Self {
        let cache = Arc::new(ExtractionCache::new());
        let models = ModelManager::new(PathBuf::from(&config.extraction.data_dir));

        let topics = match config.extraction.topic_model_source {
            TopicModelSource::Llm => TopicExtractor::Llm(LlmTopics::new(
                Arc::clone(&clients),
                config.models.topic_model.clone(),
                retry_policy(&config),
            )),
            TopicModelSource::Statistical => TopicExtractor::Statistical(StatisticalTopics::new(
                LazyModel::new(topic_model_loader(
                    models.clone(),
                    config.extraction.topic_model_path.clone(),
                )),
                Arc::clone(&cache),
            )),
        };

        let entities = EntityExtractor::new(
            LazyModel::new(token_classifier_loader(
                models,
                config.extraction.ner_model.clone(),
            )),
            Arc::clone(&cache),
        );

        debug!(topic_strategy = topics.name(), "extraction pipeline created");
        Self {
            config,
            clients,
            cache,
            topics,
            entities,
            storage: None,
        }
    }

    /// Attaches the store that discrete extraction reads from and writes to.
    pub fn with_storage<S>(mut self, storage: Arc<S>) -> Self
    where
        S: StorageAdapter + MemoryIndexer,
    {
        self.storage = Some(StorageHandles {
            storage: Arc::clone(&storage) as Arc<dyn StorageAdapter>,
            indexer: storage as Arc<dyn MemoryIndexer>,
        });
        self
    }

    /// Uses `model` for topic extraction instead of the configured strategy.
    pub fn with_topic_model(mut self, model: Arc<dyn TopicModel>) -> Self {
        self.topics = TopicExtractor::Statistical(StatisticalTopics::new(
            LazyModel::ready(model),
            Arc::clone(&self.cache),
        ));
        self
    }

    /// Uses `classifier` for entity extraction instead of the ONNX model.
    pub fn with_token_classifier(mut self, classifier: Arc<dyn TokenClassifier>) -> Self {
        self.entities = EntityExtractor::new(LazyModel::ready(classifier), Arc::clone(&self.cache));
        self
    }

    pub fn config(&self) -> &MnemoConfig {
        &self.config
    }

    pub fn clients(&self) -> &Arc<ClientCache> {
        &self.clients
    }

    pub fn cache(&self) -> &ExtractionCache {
        &self.cache
    }

    /// Named entities in `text`. Never fails; see [`EntityExtractor::extract`].
    pub async fn extract_entities(&self, text: &str) -> Vec<String> {
        self.entities.extract(text).await
    }

    /// Topic labels for `text` from the configured strategy. `count` defaults
    /// to `extraction.top_k_topics` and must be positive.
    pub async fn extract_topics(
        &self,
        text: &str,
        count: Option<usize>,
    ) -> Result<Vec<String>, MnemoError> {
        let count = count.unwrap_or(self.config.extraction.top_k_topics);
        if count == 0 {
            return Err(MnemoError::Validation("topic count must be at least 1".into()));
        }
        self.topics.extract(text, count).await
    }

    /// Runs every enabled extractor over `text`, returning deduplicated
    /// `(topics, entities)`.
    pub async fn handle_extraction(
        &self,
        text: &str,
    ) -> Result<(Vec<String>, Vec<String>), MnemoError> {
        let extraction = &self.config.extraction;

        let topics = if extraction.enable_topic_extraction {
            self.extract_topics(text, None).await?
        } else {
            Vec::new()
        };

        let entities = if extraction.enable_ner {
            self.extract_entities(text).await
        } else {
            Vec::new()
        };

        Ok((
            dedupe_preserving_order(topics),
            dedupe_preserving_order(entities),
        ))
    }

    /// Adds extracted topics and entities to `record`, keeping what it
    /// already had first.
    pub async fn enrich_record(&self, mut record: MemoryRecord) -> Result<MemoryRecord, MnemoError> {
        if record.text.trim().is_empty() {
            return Err(MnemoError::Validation(format!(
                "memory {} has no text to enrich",
                record.id
            )));
        }

        let (topics, entities) = self.handle_extraction(&record.text).await?;
        record.topics.extend(topics);
        record.topics = dedupe_preserving_order(record.topics);
        record.entities.extend(entities);
        record.entities = dedupe_preserving_order(record.entities);
        Ok(record)
    }

    /// Synthesizes episodic and semantic memories from `records`, or from
    /// every unprocessed message in storage when `records` is `None` or empty.
    pub async fn extract_discrete_memories(
        &self,
        records: Option<Vec<MemoryRecord>>,
        deduplicate: bool,
    ) -> Result<DiscreteExtractionReport, MnemoError> {
        if !self.config.extraction.enable_discrete_memory_extraction {
            info!("discrete memory extraction disabled");
            return Ok(DiscreteExtractionReport::default());
        }

        let handles = self.storage.clone().ok_or_else(|| {
            MnemoError::Config("discrete memory extraction needs a storage adapter".into())
        })?;

        let extraction = &self.config.extraction;
        let extractor = DiscreteExtractor::new(
            Arc::clone(&self.clients),
            handles.storage,
            handles.indexer,
            DiscreteSettings {
                model: self.config.models.generation_model.clone(),
                top_k_topics: extraction.top_k_topics,
                page_size: extraction.discrete_page_size,
                concurrency: extraction.discrete_concurrency,
                retry: retry_policy(&self.config),
            },
        );
        extractor.run(records, deduplicate).await
    }
}

fn retry_policy(config: &MnemoConfig) -> RetryPolicy {
    RetryPolicy::new(
        config.extraction.retry_attempts,
        Duration::from_millis(config.extraction.retry_backoff_ms),
    )
}

/// Downloads the sentence embedder if needed and loads the topic table.
fn topic_model_loader(models: ModelManager, path: Option<String>) -> ModelLoader<dyn TopicModel> {
    Arc::new(move || -> BoxFuture<'static, Result<Arc<dyn TopicModel>, MnemoError>> {
        let models = models.clone();
        let path = path.clone();
        Box::pin(async move {
            let path = path.ok_or_else(|| {
                MnemoError::Config("statistical topics need `extraction.topic_model_path`".into())
            })?;
            let dir = models.ensure_embedding_model().await?;
            let embedder: Arc<dyn SentenceEmbedder> = Arc::new(OnnxEmbedder::new(&dir)?);
            let model = CentroidTopicModel::from_path(Path::new(&path), embedder).await?;
            info!(path = %path, topics = model.topic_count(), "topic model loaded");
            let model: Arc<dyn TopicModel> = Arc::new(model);
            Ok(model)
        })
    })
}

/// Downloads the NER model from `repo` if needed and loads it.
fn token_classifier_loader(models: ModelManager, repo: String) -> ModelLoader<dyn TokenClassifier> {
    Arc::new(move || -> BoxFuture<'static, Result<Arc<dyn TokenClassifier>, MnemoError>> {
        let models = models.clone();
        let repo = repo.clone();
        Box::pin(async move {
            let dir = models.ensure_ner_model(&repo).await?;
            let classifier = OnnxTokenClassifier::new(&dir)?;
            info!(repo = %repo, labels = classifier.labels().len(), "NER model loaded");
            let classifier: Arc<dyn TokenClassifier> = Arc::new(classifier);
            Ok(classifier)
        })
    })
}
