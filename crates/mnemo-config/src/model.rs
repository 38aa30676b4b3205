// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemo extraction pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Mnemo configuration.
///
/// Every section is optional and defaults to the values documented on its fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemoConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Which model names the pipeline asks for.
    #[serde(default)]
    pub models: ModelsConfig,

    /// OpenAI (or OpenAI-compatible) API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Topic, entity, and discrete-memory extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Model selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    /// Model used for discrete memory synthesis.
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Model used by the LLM topic strategy.
    #[serde(default = "default_generation_model")]
    pub topic_model: String,

    /// Embedding model requested from the OpenAI embeddings endpoint.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            generation_model: default_generation_model(),
            topic_model: default_generation_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Alternate API-compatible endpoint. `None` falls back to `OPENAI_API_BASE`,
    /// then to the public OpenAI endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key. `None` falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Maximum tokens to generate per completion.
    #[serde(default = "default_anthropic_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            max_tokens: default_anthropic_max_tokens(),
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_anthropic_max_tokens() -> u32 {
    1024
}

/// Which strategy produces topic labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicModelSource {
    /// Prompt the configured topic model.
    #[default]
    Llm,
    /// Local pre-trained topic model.
    #[serde(alias = "bertopic")]
    Statistical,
}

/// Extraction pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Attach topics to enriched records.
    #[serde(default = "default_true")]
    pub enable_topic_extraction: bool,

    #[serde(default)]
    pub topic_model_source: TopicModelSource,

    /// Topic table for the statistical strategy (JSON). Required when
    /// `topic_model_source = "statistical"`.
    #[serde(default)]
    pub topic_model_path: Option<String>,

    /// Default number of topics requested per text.
    #[serde(default = "default_top_k_topics")]
    pub top_k_topics: usize,

    /// Attach named entities to enriched records.
    #[serde(default = "default_true")]
    pub enable_ner: bool,

    /// HuggingFace repository of the token-classification model.
    #[serde(default = "default_ner_model")]
    pub ner_model: String,

    /// Synthesize episodic/semantic memories from stored messages.
    #[serde(default = "default_true")]
    pub enable_discrete_memory_extraction: bool,

    /// Attempts per structured LLM call (topics, discrete memories).
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between attempts in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Page size when scanning storage for unprocessed messages.
    #[serde(default = "default_discrete_page_size")]
    pub discrete_page_size: usize,

    /// Per-record LLM calls allowed in flight during discrete extraction.
    #[serde(default = "default_discrete_concurrency")]
    pub discrete_concurrency: usize,

    /// Where downloaded model files live.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enable_topic_extraction: true,
            topic_model_source: TopicModelSource::default(),
            topic_model_path: None,
            top_k_topics: default_top_k_topics(),
            enable_ner: true,
            ner_model: default_ner_model(),
            enable_discrete_memory_extraction: true,
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            discrete_page_size: default_discrete_page_size(),
            discrete_concurrency: default_discrete_concurrency(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_top_k_topics() -> usize {
    3
}

fn default_ner_model() -> String {
    "dslim/bert-base-NER".to_string()
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_discrete_page_size() -> usize {
    25
}

fn default_discrete_concurrency() -> usize {
    1
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("mnemo").display().to_string())
        .unwrap_or_else(|| "mnemo-data".to_string())
}
