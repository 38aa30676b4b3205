// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic provider for the Mnemo extraction pipeline.
//!
//! The Messages API has no structured-output switch, so JSON and function
//! schemas requested through [`ChatRequest`] are folded into the prompt text.
//! Anthropic offers no embedding endpoint.

pub mod client;
pub mod types;

use async_trait::async_trait;
use mnemo_config::MnemoConfig;
use mnemo_core::error::MnemoError;
use mnemo_core::traits::{ChatProvider, PluginAdapter};
use mnemo_core::types::{
    AdapterType, ChatRequest, HealthStatus, ModelProvider, ResponseFormat, UnifiedChatResponse,
};
use ndarray::Array2;
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest, MessageResponse};

const JSON_OBJECT_INSTRUCTION: &str = "You must respond with a valid JSON object.";
const SCHEMA_INSTRUCTION: &str = "You must respond with a JSON object matching this schema:";

/// Anthropic Claude provider implementing [`ChatProvider`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicProvider {
    client: AnthropicClient,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Creates a provider from the loaded configuration.
    pub fn new(config: &MnemoConfig) -> Result<Self, MnemoError> {
        let api_key = resolve_api_key(&config.anthropic.api_key)?;
        let client = AnthropicClient::new(&api_key, &config.anthropic.api_version)?;

        info!(
            api_version = %config.anthropic.api_version,
            max_tokens = config.anthropic.max_tokens,
            "Anthropic provider initialized"
        );

        Ok(Self {
            client,
            max_tokens: config.anthropic.max_tokens,
        })
    }

    #[cfg(test)]
    fn with_client(client: AnthropicClient, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    fn to_message_request(&self, request: ChatRequest) -> Result<MessageRequest, MnemoError> {
        let prompt = build_prompt(&request)?;
        Ok(MessageRequest {
            model: request.model,
            messages: vec![ApiMessage {
                role: "user".into(),
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        })
    }
}

/// Folds structured-output requirements into the prompt.
///
/// A `json_object` format appends a plain JSON instruction. Functions plus a
/// forced `function_call` append the first function's `parameters` schema.
pub fn build_prompt(request: &ChatRequest) -> Result<String, MnemoError> {
    let mut prompt = request.prompt.clone();

    if request.response_format == Some(ResponseFormat::JsonObject) {
        prompt = format!("{prompt}\n\n{JSON_OBJECT_INSTRUCTION}");
    }

    if let (Some(functions), Some(_)) = (&request.functions, &request.function_call) {
        let schema = functions
            .first()
            .and_then(|f| f.get("parameters"))
            .ok_or_else(|| {
                MnemoError::Validation("function_call given but first function has no parameters".into())
            })?;
        let pretty = serde_json::to_string_pretty(schema)
            .map_err(|e| MnemoError::Internal(format!("failed to render function schema: {e}")))?;
        prompt = format!("{prompt}\n\n{SCHEMA_INSTRUCTION}\n{pretty}");
    }

    Ok(prompt)
}

/// Maps a Messages API reply into the unified shape: one choice holding the
/// first text block, usage summed over input and output tokens.
pub fn normalize_response(response: &MessageResponse) -> UnifiedChatResponse {
    UnifiedChatResponse::from_text(
        response.first_text().unwrap_or_default(),
        response.usage.total(),
    )
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        // No cheap endpoint to ping without spending tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn provider(&self) -> ModelProvider {
        ModelProvider::Anthropic
    }

    async fn create_chat_completion(
        &self,
        request: ChatRequest,
    ) -> Result<UnifiedChatResponse, MnemoError> {
        let msg_request = self.to_message_request(request)?;
        let response = self.client.complete_message(&msg_request).await?;
        debug!(
            model = %response.model,
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion received"
        );
        Ok(normalize_response(&response))
    }

    async fn create_embedding(&self, _texts: &[String]) -> Result<Array2<f32>, MnemoError> {
        Err(MnemoError::UnsupportedOperation(
            "Anthropic does not provide an embedding API; use an OpenAI embedding model".into(),
        ))
    }
}

/// Resolves the API key: config value, then `ANTHROPIC_API_KEY`.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, MnemoError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            MnemoError::Config(
                "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApiUsage, ResponseContentBlock};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_provider(server: &MockServer) -> AnthropicProvider {
        let client = AnthropicClient::new("test-key", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        AnthropicProvider::with_client(client, 1024)
    }

    #[test]
    fn json_object_appends_instruction() {
        let request = ChatRequest::new("claude-3-opus-20240229", "List topics").json_object();
        assert_eq!(
            build_prompt(&request).unwrap(),
            "List topics\n\nYou must respond with a valid JSON object."
        );
    }

    #[test]
    fn function_schema_is_appended_pretty() {
        let request = ChatRequest::new("claude-3-opus-20240229", "Extract").with_functions(
            vec![serde_json::json!({
                "name": "extract",
                "parameters": {"type": "object"}
            })],
            Some(serde_json::json!({"name": "extract"})),
        );
        assert_eq!(
            build_prompt(&request).unwrap(),
            "Extract\n\nYou must respond with a JSON object matching this schema:\n{\n  \"type\": \"object\"\n}"
        );
    }

    #[test]
    fn functions_without_function_call_leave_prompt_alone() {
        let request = ChatRequest::new("m", "Extract")
            .with_functions(vec![serde_json::json!({"name": "f", "parameters": {}})], None);
        assert_eq!(build_prompt(&request).unwrap(), "Extract");
    }

    #[test]
    fn plain_prompt_is_unchanged() {
        let request = ChatRequest::new("m", "Just text");
        assert_eq!(build_prompt(&request).unwrap(), "Just text");
    }

    #[test]
    fn normalize_uses_first_text_block_and_sums_usage() {
        let response = MessageResponse {
            id: "msg".into(),
            content: vec![
                ResponseContentBlock::ToolUse {
                    id: "tu".into(),
                    name: "t".into(),
                    input: serde_json::json!({}),
                },
                ResponseContentBlock::Text {
                    text: "{\"topics\": []}".into(),
                },
            ],
            model: "claude-3-opus-20240229".into(),
            stop_reason: None,
            usage: ApiUsage {
                input_tokens: 12,
                output_tokens: 8,
            },
        };
        let unified = normalize_response(&response);
        assert_eq!(unified.choices.len(), 1);
        assert_eq!(unified.content(), Some("{\"topics\": []}"));
        assert_eq!(unified.total_tokens(), 20);
    }

    #[test]
    fn normalize_without_text_yields_empty_content() {
        let response: MessageResponse = serde_json::from_value(serde_json::json!({
            "content": []
        }))
        .unwrap();
        let unified = normalize_response(&response);
        assert_eq!(unified.content(), Some(""));
        assert_eq!(unified.total_tokens(), 0);
    }

    #[test]
    fn resolve_api_key_from_config() {
        assert_eq!(resolve_api_key(&Some("sk-ant-1".into())).unwrap(), "sk-ant-1");
    }

    #[test]
    fn resolve_api_key_none_falls_back_to_env() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            assert!(matches!(resolve_api_key(&None), Err(MnemoError::Config(_))));
            assert!(matches!(
                resolve_api_key(&Some(String::new())),
                Err(MnemoError::Config(_))
            ));

            jail.set_env("ANTHROPIC_API_KEY", "sk-ant-env");
            assert_eq!(resolve_api_key(&None).unwrap(), "sk-ant-env");
            assert_eq!(resolve_api_key(&Some("sk-cfg".into())).unwrap(), "sk-cfg");
            Ok(())
        });
    }

    #[tokio::test]
    async fn embeddings_are_unsupported() {
        let server = MockServer::start().await;
        let err = test_provider(&server)
            .create_embedding(&["x".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MnemoError::UnsupportedOperation(_)));
    }

    #[tokio::test]
    async fn chat_completion_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(serde_json::json!({
                "model": "claude-3-5-haiku-20241022",
                "max_tokens": 1024,
                "messages": [{
                    "role": "user",
                    "content": "Topics?\n\nYou must respond with a valid JSON object."
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "{\"topics\": [\"rust\"]}"}],
                "model": "claude-3-5-haiku-20241022",
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 11, "output_tokens": 6}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest::new("claude-3-5-haiku-20241022", "Topics?").json_object();
        let resp = test_provider(&server)
            .create_chat_completion(request)
            .await
            .unwrap();
        assert_eq!(resp.content(), Some("{\"topics\": [\"rust\"]}"));
        assert_eq!(resp.total_tokens(), 17);
    }
}
