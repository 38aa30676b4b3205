// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use mnemo_config::MnemoConfig;
use mnemo_core::types::{MemoryRecord, ModelProvider};
use mnemo_core::{ChatProvider, MnemoError};
use mnemo_memory::ExtractionPipeline;
use mnemo_router::ClientCache;
use mnemo_test_utils::MockChatProvider;

/// Defaults with no retry delay and no model directory side effects.
pub fn test_config() -> MnemoConfig {
    let mut config = MnemoConfig::default();
    config.extraction.retry_backoff_ms = 0;
    config.extraction.data_dir = "/nonexistent/mnemo-test".to_string();
    config
}

/// A client cache serving `provider` for every vendor.
pub fn clients_for(provider: Arc<MockChatProvider>) -> Arc<ClientCache> {
    Arc::new(ClientCache::with_factory(Arc::new(
        move |_: ModelProvider| -> Result<Arc<dyn ChatProvider>, MnemoError> {
            let client: Arc<dyn ChatProvider> = provider.clone();
            Ok(client)
        },
    )))
}

pub fn pipeline(config: MnemoConfig, provider: Arc<MockChatProvider>) -> ExtractionPipeline {
    ExtractionPipeline::new(Arc::new(config), clients_for(provider))
}

/// `n` unprocessed messages with ids `m00`, `m01`, ...
pub fn messages(n: usize) -> Vec<MemoryRecord> {
    (0..n)
        .map(|i| MemoryRecord::message(format!("m{i:02}"), format!("message number {i}")))
        .collect()
}
