// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Types produced and consumed by the extraction pipeline.

use mnemo_core::MnemoError;
use mnemo_core::types::{MemoryRecord, MemoryType};
use serde::Deserialize;
use uuid::Uuid;

/// Whether a strategy swallows its own failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionPolicy {
    /// Failures are logged and turned into an empty result.
    pub best_effort: bool,
}

impl ExtractionPolicy {
    /// Entity extraction: a failure yields no entities.
    pub const ENTITIES: Self = Self { best_effort: true };
    /// Topic extraction: failures propagate after retries.
    pub const TOPICS: Self = Self { best_effort: false };
    /// Discrete memory synthesis: failures propagate after retries.
    pub const DISCRETE: Self = Self { best_effort: false };
}

/// `{"topics": [...]}` reply of the LLM topic strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicsEnvelope {
    pub topics: Vec<String>,
}

/// One memory synthesized by the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedMemory {
    #[serde(rename = "type", default)]
    pub memory_type: MemoryType,
    pub text: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
}

impl ExtractedMemory {
    /// A new long-term record with a fresh time-ordered id, already marked
    /// as extracted so it is never fed back into synthesis.
    pub fn into_record(self) -> MemoryRecord {
        MemoryRecord {
            id: Uuid::now_v7().to_string(),
            text: self.text,
            memory_type: self.memory_type,
            topics: self.topics,
            entities: self.entities,
            discrete_memory_extracted: true,
        }
    }
}

/// `{"memories": [...]}` reply of the discrete extraction prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoriesEnvelope {
    pub memories: Vec<ExtractedMemory>,
}

impl MemoriesEnvelope {
    /// Parses and validates a model reply.
    ///
    /// The top level must be a JSON object whose `memories` field is a list,
    /// and every entry must carry `text`. Anything else is a
    /// [`MnemoError::MalformedResponse`].
    pub fn parse(content: &str) -> Result<Self, MnemoError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| MnemoError::malformed(format!("reply is not JSON: {e}")))?;
        let Some(object) = value.as_object() else {
            return Err(MnemoError::malformed("reply is not a JSON object"));
        };
        match object.get("memories") {
            Some(serde_json::Value::Array(_)) => {}
            Some(_) => return Err(MnemoError::malformed("`memories` is not a list")),
            None => return Err(MnemoError::malformed("missing field `memories`")),
        }
        serde_json::from_value(value)
            .map_err(|e| MnemoError::malformed(format!("invalid memory entry: {e}")))
    }
}

/// Outcome of one discrete extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscreteExtractionReport {
    /// Source records marked as extracted.
    pub processed: usize,
    /// Source records deleted for having no text.
    pub deleted: usize,
    /// New memories handed to the indexer.
    pub created: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_encode_the_failure_asymmetry() {
        assert!(ExtractionPolicy::ENTITIES.best_effort);
        assert!(!ExtractionPolicy::TOPICS.best_effort);
        assert!(!ExtractionPolicy::DISCRETE.best_effort);
    }

    #[test]
    fn parse_valid_envelope() {
        let env = MemoriesEnvelope::parse(
            r#"{"memories": [
                {"type": "semantic", "text": "Trek discontinued the 520", "topics": ["bicycle"], "entities": ["Trek"]},
                {"text": "User prefers window seats"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(env.memories.len(), 2);
        assert_eq!(env.memories[0].memory_type, MemoryType::Semantic);
        assert_eq!(env.memories[1].memory_type, MemoryType::Episodic);
        assert!(env.memories[1].topics.is_empty());
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = MemoriesEnvelope::parse("not json").unwrap_err();
        assert!(matches!(err, MnemoError::MalformedResponse { .. }));
    }

    #[test]
    fn parse_rejects_non_object_and_non_list() {
        assert!(MemoriesEnvelope::parse("[1, 2]").is_err());
        let err = MemoriesEnvelope::parse(r#"{"memories": "none"}"#).unwrap_err();
        assert!(err.to_string().contains("not a list"));
        let err = MemoriesEnvelope::parse(r#"{"facts": []}"#).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn parse_rejects_entry_without_text() {
        let err = MemoriesEnvelope::parse(r#"{"memories": [{"type": "episodic"}]}"#).unwrap_err();
        assert!(matches!(err, MnemoError::MalformedResponse { .. }));
    }

    #[test]
    fn empty_memory_list_is_valid() {
        assert!(MemoriesEnvelope::parse(r#"{"memories": []}"#)
            .unwrap()
            .memories
            .is_empty());
    }

    #[test]
    fn into_record_assigns_fresh_ids_and_sets_flag() {
        let memory = ExtractedMemory {
            memory_type: MemoryType::Semantic,
            text: "X".into(),
            topics: vec![],
            entities: vec![],
        };
        let a = memory.clone().into_record();
        let b = memory.into_record();
        assert_ne!(a.id, b.id);
        assert!(a.discrete_memory_extracted);
        assert_eq!(a.memory_type, MemoryType::Semantic);
        assert_eq!(a.text, "X");
    }
}
