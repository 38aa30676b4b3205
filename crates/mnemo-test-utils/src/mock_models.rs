// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-output local models.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use mnemo_core::MnemoError;
use mnemo_core::traits::{TokenClassifier, TopicModel};
use mnemo_core::types::{TokenEntity, TopicAssignment};

/// A topic model returning the same assignments for every text.
#[derive(Default)]
pub struct MockTopicModel {
    assignments: Vec<TopicAssignment>,
    terms: HashMap<i64, Vec<(String, f32)>>,
    calls: AtomicUsize,
}

impl MockTopicModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topic `id` with the given terms and appends an assignment to it.
    pub fn with_topic(mut self, id: i64, score: f32, terms: &[(&str, f32)]) -> Self {
        self.assignments.push(TopicAssignment { topic: id, score });
        self.terms.insert(
            id,
            terms.iter().map(|(t, w)| (t.to_string(), *w)).collect(),
        );
        self
    }

    /// Appends an assignment with no terms, e.g. the outlier topic.
    pub fn with_assignment(mut self, id: i64, score: f32) -> Self {
        self.assignments.push(TopicAssignment { topic: id, score });
        self
    }

    /// Number of `transform` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TopicModel for MockTopicModel {
    fn transform(&self, _text: &str) -> Result<Vec<TopicAssignment>, MnemoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.assignments.clone())
    }

    fn topic_terms(&self, topic: i64) -> Option<Vec<(String, f32)>> {
        self.terms.get(&topic).cloned()
    }
}

/// A token classifier returning fixed tokens, or failing every call.
#[derive(Default)]
pub struct MockTokenClassifier {
    tokens: Vec<TokenEntity>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockTokenClassifier {
    /// Tags each word with `B-MISC`.
    pub fn with_words(words: &[&str]) -> Self {
        Self {
            tokens: words
                .iter()
                .map(|w| TokenEntity {
                    word: w.to_string(),
                    label: "B-MISC".into(),
                    score: 0.99,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenClassifier for MockTokenClassifier {
    fn classify(&self, _text: &str) -> Result<Vec<TokenEntity>, MnemoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MnemoError::Model("mock classifier failure".into()));
        }
        Ok(self.tokens.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_model_counts_calls() {
        let model = MockTopicModel::new().with_topic(0, 0.9, &[("rust", 0.5)]);
        assert_eq!(model.transform("x").unwrap().len(), 1);
        assert_eq!(model.calls(), 1);
        assert_eq!(model.topic_terms(0).unwrap()[0].0, "rust");
        assert!(model.topic_terms(7).is_none());
    }

    #[test]
    fn failing_classifier_errors() {
        let classifier = MockTokenClassifier::failing();
        assert!(classifier.classify("x").is_err());
        assert_eq!(classifier.calls(), 1);
    }
}
