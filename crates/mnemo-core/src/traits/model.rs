// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local model traits used by the statistical topic strategy and entity extraction.

use crate::error::MnemoError;
use crate::types::{TokenEntity, TopicAssignment};

/// A pre-trained topic model.
pub trait TopicModel: Send + Sync {
    /// Assigns `text` to topics, best first. An assignment to
    /// [`OUTLIER_TOPIC`](crate::types::OUTLIER_TOPIC) means no topic fits.
    fn transform(&self, text: &str) -> Result<Vec<TopicAssignment>, MnemoError>;

    /// The `(term, weight)` pairs describing a topic, most representative first.
    fn topic_terms(&self, topic: i64) -> Option<Vec<(String, f32)>>;
}

/// A token-classification (NER) model.
pub trait TokenClassifier: Send + Sync {
    /// Returns every token tagged with a non-outside label, in text order.
    fn classify(&self, text: &str) -> Result<Vec<TokenEntity>, MnemoError>;
}
