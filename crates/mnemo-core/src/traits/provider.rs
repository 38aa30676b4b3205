// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM chat and embedding backends.

use async_trait::async_trait;
use ndarray::Array2;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatRequest, ModelProvider, UnifiedChatResponse};

/// One LLM vendor behind a single contract.
///
/// Implementations own all request/response translation for their vendor and
/// must be safe to call again after a failure: no call leaves partial side
/// effects behind.
#[async_trait]
pub trait ChatProvider: PluginAdapter {
    /// Which vendor this client talks to.
    fn provider(&self) -> ModelProvider;

    /// Sends a single-prompt completion and normalizes the reply.
    async fn create_chat_completion(
        &self,
        request: ChatRequest,
    ) -> Result<UnifiedChatResponse, MnemoError>;

    /// Embeds `texts`, returning one row per input in input order.
    ///
    /// Providers without an embedding API return
    /// [`MnemoError::UnsupportedOperation`].
    async fn create_embedding(&self, texts: &[String]) -> Result<Array2<f32>, MnemoError>;
}
