// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic extraction strategies.
//!
//! - [`StatisticalTopics`]: a local pre-trained [`TopicModel`], cached
//! - [`LlmTopics`]: prompts a chat model for a `{"topics": [...]}` object

use std::sync::Arc;

use mnemo_core::types::OUTLIER_TOPIC;
use mnemo_core::{ChatProvider, ChatRequest, MnemoError, TopicModel};
use mnemo_resilience::{RetryPolicy, retry};
use mnemo_router::ClientCache;
use tracing::{debug, warn};

use crate::cache::ExtractionCache;
use crate::lazy::LazyModel;
use crate::prompts::topic_prompt;
use crate::types::{ExtractionPolicy, TopicsEnvelope};

/// Topic labels from a local topic model.
pub struct StatisticalTopics {
    model: LazyModel<dyn TopicModel>,
    cache: Arc<ExtractionCache>,
}

impl StatisticalTopics {
    pub fn new(model: LazyModel<dyn TopicModel>, cache: Arc<ExtractionCache>) -> Self {
        Self { model, cache }
    }

    /// Walks at most `count` ranked assignments, skipping outliers, and
    /// collects every term of each assigned topic.
    pub async fn extract(&self, text: &str, count: usize) -> Result<Vec<String>, MnemoError> {
        if let Some(cached) = self.cache.topics(text, count) {
            debug!(topics = cached.len(), "topic cache hit");
            return Ok(cached);
        }

        let model = self.model.get().await?;
        let mut topics = Vec::new();
        for assignment in model.transform(text)?.into_iter().take(count) {
            if assignment.topic == OUTLIER_TOPIC {
                continue;
            }
            if let Some(terms) = model.topic_terms(assignment.topic) {
                topics.extend(terms.into_iter().map(|(term, _)| term));
            }
        }

        self.cache.store_topics(text, count, topics.clone());
        Ok(topics)
    }
}

/// Topic labels from a chat model.
pub struct LlmTopics {
    clients: Arc<ClientCache>,
    model: String,
    retry: RetryPolicy,
}

impl LlmTopics {
    pub fn new(clients: Arc<ClientCache>, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            clients,
            model: model.into(),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Up to `count` topics. Undecodable replies and provider errors are
    /// retried; the last error propagates once the attempts are spent.
    pub async fn extract(&self, text: &str, count: usize) -> Result<Vec<String>, MnemoError> {
        let client = self.clients.get_client_for_model(&self.model).await?;
        let prompt = topic_prompt(text, count);

        let mut topics = retry(&self.retry, MnemoError::is_retriable, |attempt| {
            let client = Arc::clone(&client);
            let request = ChatRequest::new(&self.model, prompt.clone()).json_object();
            async move {
                let response = client.create_chat_completion(request).await?;
                let content = response.content().unwrap_or_default();
                parse_topics(content).inspect_err(|e| {
                    warn!(attempt, error = %e, content, "could not decode topics");
                })
            }
        })
        .await?;

        topics.truncate(count);
        Ok(topics)
    }
}

/// Reads the `topics` list out of a model reply.
pub fn parse_topics(content: &str) -> Result<Vec<String>, MnemoError> {
    serde_json::from_str::<TopicsEnvelope>(content)
        .map(|envelope| envelope.topics)
        .map_err(|e| MnemoError::malformed(format!("invalid topics reply: {e}")))
}

/// The configured topic strategy.
pub enum TopicExtractor {
    Statistical(StatisticalTopics),
    Llm(LlmTopics),
}

impl TopicExtractor {
    pub async fn extract(&self, text: &str, count: usize) -> Result<Vec<String>, MnemoError> {
        match self {
            TopicExtractor::Statistical(strategy) => strategy.extract(text, count).await,
            TopicExtractor::Llm(strategy) => strategy.extract(text, count).await,
        }
    }

    pub fn policy(&self) -> ExtractionPolicy {
        ExtractionPolicy::TOPICS
    }

    pub fn name(&self) -> &'static str {
        match self {
            TopicExtractor::Statistical(_) => "statistical",
            TopicExtractor::Llm(_) => "llm",
        }
    }
}
