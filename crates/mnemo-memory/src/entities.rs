// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named entity extraction.
//!
//! Best effort: any model failure is logged and yields no entities.

use std::collections::HashSet;
use std::sync::Arc;

use mnemo_core::types::TokenEntity;
use mnemo_core::{MnemoError, TokenClassifier};
use tracing::{debug, error};

use crate::cache::ExtractionCache;
use crate::lazy::LazyModel;
use crate::types::ExtractionPolicy;

/// Glues WordPiece continuation tokens (`##xyz`) onto the preceding word.
///
/// `["Trek", "##520", "Paris"]` becomes `["Trek520", "Paris"]`. A leading
/// continuation with nothing before it starts an entity of its own.
pub fn group_wordpiece_tokens(tokens: &[TokenEntity]) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for token in tokens {
        match token.word.strip_prefix("##") {
            Some(piece) => current.get_or_insert_with(String::new).push_str(piece),
            None => {
                if let Some(done) = current.replace(token.word.clone()) {
                    entities.push(done);
                }
            }
        }
    }
    entities.extend(current);
    entities
}

/// Removes repeats, keeping the first occurrence of each value.
pub fn dedupe_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

pub struct EntityExtractor {
    model: LazyModel<dyn TokenClassifier>,
    cache: Arc<ExtractionCache>,
}

impl EntityExtractor {
    pub fn new(model: LazyModel<dyn TokenClassifier>, cache: Arc<ExtractionCache>) -> Self {
        Self { model, cache }
    }

    pub fn policy(&self) -> ExtractionPolicy {
        ExtractionPolicy::ENTITIES
    }

    /// Unique entity names in `text`, in order of first appearance.
    ///
    /// Successful results are cached by the SHA-256 of the text; failures are
    /// not cached.
    pub async fn extract(&self, text: &str) -> Vec<String> {
        match self.try_extract(text).await {
            Ok(entities) => entities,
            Err(e) => {
                error!(error = %e, "entity extraction failed");
                Vec::new()
            }
        }
    }

    /// Like [`extract`](Self::extract) but surfaces model failures.
    pub async fn try_extract(&self, text: &str) -> Result<Vec<String>, MnemoError> {
        if let Some(cached) = self.cache.entities(text) {
            debug!(entities = cached.len(), "entity cache hit");
            return Ok(cached);
        }
        let entities = self.run(text).await?;
        self.cache.store_entities(text, entities.clone());
        Ok(entities)
    }

    async fn run(&self, text: &str) -> Result<Vec<String>, MnemoError> {
        let model = self.model.get().await?;
        let tokens = model.classify(text)?;
        Ok(dedupe_preserving_order(group_wordpiece_tokens(&tokens)))
    }
}
