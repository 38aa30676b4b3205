// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible provider for the Mnemo extraction pipeline.
//!
//! Implements [`ChatProvider`] over `/chat/completions` and `/embeddings`,
//! against the public API or any compatible endpoint.

pub mod client;
pub mod types;

use async_trait::async_trait;
use mnemo_config::MnemoConfig;
use mnemo_core::error::MnemoError;
use mnemo_core::traits::{ChatProvider, PluginAdapter};
use mnemo_core::types::{
    AdapterType, ChatChoice, ChatMessage, ChatRequest, ChatUsage, HealthStatus, ModelProvider,
    UnifiedChatResponse,
};
use ndarray::Array2;
use tracing::{debug, info};

use crate::client::{DEFAULT_BASE_URL, OpenAiClient};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, EmbeddingRequest, RequestMessage};

/// Inputs sent per embeddings request.
pub const EMBEDDING_BATCH_SIZE: usize = 20;

/// Vector width assumed until the caller supplies the registry's value.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// OpenAI provider implementing [`ChatProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
/// Base URL resolution order: config -> `OPENAI_API_BASE` env var -> public API.
pub struct OpenAiProvider {
    client: OpenAiClient,
    embedding_model: String,
    embedding_dimensions: usize,
}

impl OpenAiProvider {
    /// Creates a provider from the loaded configuration.
    pub fn new(config: &MnemoConfig) -> Result<Self, MnemoError> {
        let api_key = resolve_api_key(&config.openai.api_key)?;
        let base_url = resolve_base_url(&config.openai.base_url);
        let provider =
            Self::from_parts(&api_key, &base_url, config.models.embedding_model.clone())?;
        info!(
            base_url = %provider.client.base_url(),
            embedding_model = %provider.embedding_model,
            "OpenAI provider initialized"
        );
        Ok(provider)
    }

    /// Creates a provider from explicit settings, bypassing config and env lookup.
    pub fn from_parts(
        api_key: &str,
        base_url: &str,
        embedding_model: String,
    ) -> Result<Self, MnemoError> {
        if api_key.trim().is_empty() {
            return Err(MnemoError::Config("OpenAI API key must not be empty".into()));
        }
        Ok(Self {
            client: OpenAiClient::new(api_key, base_url)?,
            embedding_model,
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        })
    }

    /// Sets the column count reported for an empty embedding batch.
    pub fn with_embedding_dimensions(mut self, dims: usize) -> Self {
        self.embedding_dimensions = dims;
        self
    }

    /// Replaces the underlying HTTP client.
    pub fn with_client(mut self, client: OpenAiClient) -> Self {
        self.client = client;
        self
    }

    fn to_completion_request(request: ChatRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model,
            messages: vec![RequestMessage {
                role: "user".into(),
                content: request.prompt,
            }],
            response_format: request.response_format,
            functions: request.functions,
            function_call: request.function_call,
        }
    }
}

/// Maps an OpenAI reply into the unified shape.
///
/// A choice whose content is null contributes its function-call arguments,
/// or an empty string when there are none.
pub fn normalize_response(response: ChatCompletionResponse) -> UnifiedChatResponse {
    let choices = response
        .choices
        .into_iter()
        .map(|choice| {
            let message = choice.message;
            let content = message
                .content
                .or_else(|| message.function_call.and_then(|f| f.arguments))
                .unwrap_or_default();
            ChatChoice {
                message: ChatMessage { content },
            }
        })
        .collect();

    UnifiedChatResponse {
        choices,
        usage: ChatUsage {
            total_tokens: response.usage.map(|u| u.total_tokens).unwrap_or(0),
        },
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn provider(&self) -> ModelProvider {
        ModelProvider::OpenAi
    }

    async fn create_chat_completion(
        &self,
        request: ChatRequest,
    ) -> Result<UnifiedChatResponse, MnemoError> {
        let model = request.model.clone();
        let response = self
            .client
            .chat_completion(&Self::to_completion_request(request))
            .await?;
        let unified = normalize_response(response);
        debug!(
            model = %model,
            total_tokens = unified.total_tokens(),
            choices = unified.choices.len(),
            "chat completion normalized"
        );
        Ok(unified)
    }

    async fn create_embedding(&self, texts: &[String]) -> Result<Array2<f32>, MnemoError> {
        let mut rows: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

        for batch in texts.chunks(EMBEDDING_BATCH_SIZE) {
            let request = EmbeddingRequest {
                model: &self.embedding_model,
                input: batch,
            };
            let mut response = self.client.embeddings(&request).await?;
            if response.data.len() != batch.len() {
                return Err(MnemoError::provider(format!(
                    "embeddings endpoint returned {} rows for {} inputs",
                    response.data.len(),
                    batch.len()
                )));
            }
            response.data.sort_by_key(|d| d.index);
            rows.extend(response.data.into_iter().map(|d| d.embedding));
        }

        let dims = rows.first().map_or(self.embedding_dimensions, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != dims) {
            return Err(MnemoError::provider(format!(
                "embedding row {bad} has {} dimensions, expected {dims}",
                rows[bad].len()
            )));
        }

        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((texts.len(), dims), flat).map_err(|e| MnemoError::Provider {
            message: format!("failed to shape embedding matrix: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Resolves the API key: config value, then `OPENAI_API_KEY`.
pub fn resolve_api_key(config_key: &Option<String>) -> Result<String, MnemoError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            MnemoError::Config(
                "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
            )
        })
}

/// Resolves the base URL: config value, then `OPENAI_API_BASE`, then the public API.
pub fn resolve_base_url(config_url: &Option<String>) -> String {
    config_url
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| std::env::var("OPENAI_API_BASE").ok().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
