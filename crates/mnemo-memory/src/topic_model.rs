// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-trained centroid topic model.
//!
//! The model file is JSON:
//!
//! ```json
//! {
//!   "min_similarity": 0.35,
//!   "topics": [
//!     {"id": 0, "centroid": [0.12, ...], "terms": [["travel", 0.41], ["flight", 0.22]]}
//!   ]
//! }
//! ```
//!
//! A text is embedded and compared against every centroid by cosine
//! similarity. Topics at or above `min_similarity` are returned best first;
//! when none qualifies the text is an outlier.

use std::path::Path;
use std::sync::Arc;

use mnemo_core::MnemoError;
use mnemo_core::TopicModel;
use mnemo_core::types::{OUTLIER_TOPIC, TopicAssignment};
use serde::Deserialize;
use tracing::debug;

use crate::embedder::{SentenceEmbedder, l2_normalize};

fn default_min_similarity() -> f32 {
    0.3
}

#[derive(Debug, Deserialize)]
struct TopicTable {
    #[serde(default = "default_min_similarity")]
    min_similarity: f32,
    topics: Vec<CentroidTopic>,
}

#[derive(Debug, Clone, Deserialize)]
struct CentroidTopic {
    id: i64,
    centroid: Vec<f32>,
    #[serde(default)]
    terms: Vec<(String, f32)>,
}

pub struct CentroidTopicModel {
    min_similarity: f32,
    topics: Vec<CentroidTopic>,
    embedder: Arc<dyn SentenceEmbedder>,
}

impl std::fmt::Debug for CentroidTopicModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CentroidTopicModel")
            .field("min_similarity", &self.min_similarity)
            .field("topics", &self.topics.len())
            .finish()
    }
}

impl CentroidTopicModel {
    /// Parses a topic table. Centroids are normalized on load.
    pub fn from_json(json: &str, embedder: Arc<dyn SentenceEmbedder>) -> Result<Self, MnemoError> {
        let table: TopicTable = serde_json::from_str(json)
            .map_err(|e| MnemoError::Model(format!("invalid topic model: {e}")))?;

        let dims = table.topics.first().map(|t| t.centroid.len()).unwrap_or(0);
        for topic in &table.topics {
            if topic.id == OUTLIER_TOPIC {
                return Err(MnemoError::Model(format!(
                    "topic id {OUTLIER_TOPIC} is reserved for outliers"
                )));
            }
            if topic.centroid.is_empty() || topic.centroid.len() != dims {
                return Err(MnemoError::Model(format!(
                    "topic {} has a {}-dimensional centroid, expected {dims}",
                    topic.id,
                    topic.centroid.len()
                )));
            }
        }

        let topics = table
            .topics
            .into_iter()
            .map(|topic| CentroidTopic {
                centroid: l2_normalize(&topic.centroid),
                ..topic
            })
            .collect();

        Ok(Self {
            min_similarity: table.min_similarity,
            topics,
            embedder,
        })
    }

    pub async fn from_path(path: &Path, embedder: Arc<dyn SentenceEmbedder>) -> Result<Self, MnemoError> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            MnemoError::Model(format!("failed to read topic model {}: {e}", path.display()))
        })?;
        let model = Self::from_json(&json, embedder)?;
        debug!(path = %path.display(), topics = model.topics.len(), "loaded topic model");
        Ok(model)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl TopicModel for CentroidTopicModel {
    fn transform(&self, text: &str) -> Result<Vec<TopicAssignment>, MnemoError> {
        let embedding = l2_normalize(&self.embedder.embed(text)?);

        let mut best = f32::MIN;
        let mut assignments = Vec::new();
        for topic in &self.topics {
            if topic.centroid.len() != embedding.len() {
                return Err(MnemoError::Model(format!(
                    "embedding has {} dimensions but topic {} has {}",
                    embedding.len(),
                    topic.id,
                    topic.centroid.len()
                )));
            }
            let score: f32 = topic
                .centroid
                .iter()
                .zip(&embedding)
                .map(|(a, b)| a * b)
                .sum();
            best = best.max(score);
            if score >= self.min_similarity {
                assignments.push(TopicAssignment {
                    topic: topic.id,
                    score,
                });
            }
        }

        if assignments.is_empty() {
            return Ok(vec![TopicAssignment {
                topic: OUTLIER_TOPIC,
                score: if self.topics.is_empty() { 0.0 } else { best },
            }]);
        }

        assignments.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(assignments)
    }

    fn topic_terms(&self, topic: i64) -> Option<Vec<(String, f32)>> {
        self.topics
            .iter()
            .find(|t| t.id == topic)
            .map(|t| t.terms.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Embeds by keyword: "rust" and "travel" map to orthogonal axes.
    struct KeywordEmbedder;

    impl SentenceEmbedder for KeywordEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
            let rust = if text.contains("rust") { 1.0 } else { 0.0 };
            let travel = if text.contains("travel") { 1.0 } else { 0.0 };
            Ok(vec![rust, travel, 0.1])
        }
    }

    const TABLE: &str = r#"{
        "min_similarity": 0.5,
        "topics": [
            {"id": 0, "centroid": [1.0, 0.0, 0.0], "terms": [["rust", 0.4], ["cargo", 0.2]]},
            {"id": 1, "centroid": [0.0, 2.0, 0.0], "terms": [["travel", 0.5]]}
        ]
    }"#;

    fn model() -> CentroidTopicModel {
        CentroidTopicModel::from_json(TABLE, Arc::new(KeywordEmbedder)).unwrap()
    }

    #[test]
    fn assigns_closest_topic() {
        let assignments = model().transform("learning rust").unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].topic, 0);
        assert!(assignments[0].score > 0.9);
    }

    #[test]
    fn ranks_multiple_topics_best_first() {
        let assignments = model().transform("rust travel").unwrap();
        assert_eq!(assignments.len(), 2);
        assert!(assignments[0].score >= assignments[1].score);
    }

    #[test]
    fn unrelated_text_is_an_outlier() {
        let assignments = model().transform("gardening").unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].topic, OUTLIER_TOPIC);
    }

    #[test]
    fn topic_terms_lookup() {
        let model = model();
        assert_eq!(
            model.topic_terms(1),
            Some(vec![("travel".to_string(), 0.5)])
        );
        assert_eq!(model.topic_terms(7), None);
    }

    #[test]
    fn rejects_ragged_centroids() {
        let json = r#"{"topics": [
            {"id": 0, "centroid": [1.0, 0.0]},
            {"id": 1, "centroid": [1.0]}
        ]}"#;
        let err = CentroidTopicModel::from_json(json, Arc::new(KeywordEmbedder)).unwrap_err();
        assert!(matches!(err, MnemoError::Model(_)));
    }

    #[test]
    fn rejects_reserved_outlier_id() {
        let json = r#"{"topics": [{"id": -1, "centroid": [1.0]}]}"#;
        assert!(CentroidTopicModel::from_json(json, Arc::new(KeywordEmbedder)).is_err());
    }

    #[test]
    fn dimension_mismatch_at_transform_is_an_error() {
        let json = r#"{"topics": [{"id": 0, "centroid": [1.0, 0.0]}]}"#;
        let model = CentroidTopicModel::from_json(json, Arc::new(KeywordEmbedder)).unwrap();
        assert!(model.transform("rust").is_err());
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.json");
        std::fs::write(&path, TABLE).unwrap();
        let model = CentroidTopicModel::from_path(&path, Arc::new(KeywordEmbedder))
            .await
            .unwrap();
        assert_eq!(model.topic_count(), 2);
    }
}
