// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by provider clients, the model registry, and the
//! extraction pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Indexer,
}

// --- Model registry types ---

/// An external LLM vendor backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelProvider {
    /// OpenAI and OpenAI-compatible endpoints (chat + embeddings).
    OpenAi,
    /// Anthropic Messages API (chat only).
    Anthropic,
}

/// Static description of a model: who serves it and how large it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    pub provider: ModelProvider,
    /// Canonical model name sent to the provider.
    pub name: &'static str,
    /// Context window in tokens.
    pub max_tokens: u32,
    pub embedding_dimensions: usize,
}

// --- Chat types ---

/// Structured-output hint forwarded to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// A single-prompt chat completion request, provider-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub prompt: String,
    pub response_format: Option<ResponseFormat>,
    /// Function (tool) schemas in OpenAI `functions` shape.
    pub functions: Option<Vec<serde_json::Value>>,
    /// Forced function selection, e.g. `{"name": "extract"}`.
    pub function_call: Option<serde_json::Value>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            response_format: None,
            functions: None,
            function_call: None,
        }
    }

    /// Ask the provider for a bare JSON object.
    pub fn json_object(mut self) -> Self {
        self.response_format = Some(ResponseFormat::JsonObject);
        self
    }

    pub fn with_functions(
        mut self,
        functions: Vec<serde_json::Value>,
        function_call: Option<serde_json::Value>,
    ) -> Self {
        self.functions = Some(functions);
        self.function_call = function_call;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub total_tokens: u64,
}

/// The one response shape every provider normalizes into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: ChatUsage,
}

impl UnifiedChatResponse {
    /// Builds a single-choice response.
    pub fn from_text(content: impl Into<String>, total_tokens: u64) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    content: content.into(),
                },
            }],
            usage: ChatUsage { total_tokens },
        }
    }

    /// Content of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    pub fn total_tokens(&self) -> u64 {
        self.usage.total_tokens
    }
}

// --- Memory record types ---

/// Kind of a long-term memory record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemoryType {
    /// Personal experience specific to a user or agent.
    #[default]
    Episodic,
    /// General knowledge or preference.
    Semantic,
    /// A raw conversation message.
    Message,
}

/// A long-term memory record as stored by the storage adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub memory_type: MemoryType,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    /// Whether discrete-memory synthesis already ran over this record.
    #[serde(default, with = "flag")]
    pub discrete_memory_extracted: bool,
}

impl MemoryRecord {
    /// A fresh, unprocessed message record.
    pub fn message(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            memory_type: MemoryType::Message,
            topics: Vec::new(),
            entities: Vec::new(),
            discrete_memory_extracted: false,
        }
    }

    /// Clone with the extraction flag set. The flag never goes back to unset.
    pub fn marked_extracted(&self) -> Self {
        Self {
            discrete_memory_extracted: true,
            ..self.clone()
        }
    }
}

/// Serde helper storing the extraction flag as `"t"` / `"f"`.
pub mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "t" } else { "f" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "t" => Ok(true),
            "f" => Ok(false),
            other => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(other),
                &"\"t\" or \"f\"",
            )),
        }
    }
}

/// Filtered, paginated query against the storage adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query; empty means "match everything".
    pub text: String,
    pub memory_type: Option<MemoryType>,
    pub discrete_memory_extracted: Option<bool>,
    pub limit: usize,
    pub offset: usize,
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub memories: Vec<MemoryRecord>,
    pub total: usize,
}

// --- Local model types ---

/// One topic assignment from a statistical topic model. `-1` means "no topic".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicAssignment {
    pub topic: i64,
    pub score: f32,
}

/// Index of the outlier topic.
pub const OUTLIER_TOPIC: i64 = -1;

/// A single token tagged by a token-classification model.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenEntity {
    /// Sub-word token text; WordPiece continuations start with `##`.
    pub word: String,
    /// Entity label, e.g. `B-PER`.
    pub label: String,
    pub score: f32,
}
