// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat provider with scripted replies.

use std::collections::VecDeque;

use async_trait::async_trait;
use ndarray::Array2;
use tokio::sync::Mutex;

use mnemo_core::MnemoError;
use mnemo_core::traits::{ChatProvider, PluginAdapter};
use mnemo_core::types::{
    AdapterType, ChatRequest, HealthStatus, ModelProvider, UnifiedChatResponse,
};

/// One scripted outcome of `create_chat_completion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Reply with this content.
    Text(String),
    /// Fail with a `Provider` error carrying this message.
    Fail(String),
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        MockReply::Text(content.into())
    }
}

/// A chat provider that pops replies from a FIFO queue and records requests.
///
/// When the queue is empty the reply is `"mock response"`.
pub struct MockChatProvider {
    provider: ModelProvider,
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    embedding_dims: usize,
}

impl MockChatProvider {
    pub fn new(provider: ModelProvider) -> Self {
        Self {
            provider,
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            embedding_dims: 1536,
        }
    }

    /// An OpenAI-flavoured mock pre-loaded with text replies.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(responses.into_iter().map(MockReply::text))
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let mock = Self::new(ModelProvider::OpenAi);
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..mock
        }
    }

    /// Width of the zero vectors returned by `create_embedding`.
    pub fn with_embedding_dims(mut self, dims: usize) -> Self {
        self.embedding_dims = dims;
        self
    }

    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new(ModelProvider::OpenAi)
    }
}

#[async_trait]
impl PluginAdapter for MockChatProvider {
    fn name(&self) -> &str {
        "mock-chat-provider"
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
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn provider(&self) -> ModelProvider {
        self.provider
    }

    async fn create_chat_completion(
        &self,
        request: ChatRequest,
    ) -> Result<UnifiedChatResponse, MnemoError> {
        self.requests.lock().await.push(request);
        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some(MockReply::Text(content)) => Ok(UnifiedChatResponse::from_text(content, 30)),
            Some(MockReply::Fail(message)) => Err(MnemoError::provider(message)),
            None => Ok(UnifiedChatResponse::from_text("mock response", 30)),
        }
    }

    async fn create_embedding(&self, texts: &[String]) -> Result<Array2<f32>, MnemoError> {
        match self.provider {
            ModelProvider::OpenAi => Ok(Array2::zeros((texts.len(), self.embedding_dims))),
            ModelProvider::Anthropic => Err(MnemoError::UnsupportedOperation(
                "mock anthropic provider has no embeddings".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockChatProvider::default();
        let resp = provider
            .create_chat_completion(ChatRequest::new("gpt-4o-mini", "hi"))
            .await
            .unwrap();
        assert_eq!(resp.content(), Some("mock response"));
    }

    #[tokio::test]
    async fn replies_returned_in_order_and_requests_recorded() {
        let provider = MockChatProvider::with_replies([
            MockReply::text("first"),
            MockReply::Fail("boom".into()),
        ]);
        let first = provider
            .create_chat_completion(ChatRequest::new("m", "a"))
            .await
            .unwrap();
        assert_eq!(first.content(), Some("first"));
        let second = provider
            .create_chat_completion(ChatRequest::new("m", "b"))
            .await;
        assert!(matches!(second, Err(MnemoError::Provider { .. })));

        let prompts: Vec<String> = provider
            .requests()
            .await
            .into_iter()
            .map(|r| r.prompt)
            .collect();
        assert_eq!(prompts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn anthropic_mock_rejects_embeddings() {
        let provider = MockChatProvider::new(ModelProvider::Anthropic);
        let result = provider.create_embedding(&["x".into()]).await;
        assert!(matches!(result, Err(MnemoError::UnsupportedOperation(_))));

        let openai = MockChatProvider::default().with_embedding_dims(8);
        assert_eq!(
            openai.create_embedding(&["x".into(), "y".into()]).await.unwrap().dim(),
            (2, 8)
        );
    }
}
