// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mnemo memory extraction pipeline.
//!
//! This crate provides the trait definitions, error type, and shared types
//! used throughout the Mnemo workspace. Provider clients, storage adapters,
//! and local models all implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MnemoError;
pub use types::{
    AdapterType, ChatRequest, HealthStatus, MemoryRecord, MemoryType, ModelConfig,
    ModelProvider, ResponseFormat, SearchPage, SearchQuery, UnifiedChatResponse,
};

pub use traits::{
    ChatProvider, MemoryIndexer, PluginAdapter, StorageAdapter, TokenClassifier, TopicModel,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_display() {
        use std::str::FromStr;

        for variant in [AdapterType::Provider, AdapterType::Storage, AdapterType::Indexer] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_chat_provider<T: ChatProvider>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_memory_indexer<T: MemoryIndexer>() {}
        fn _assert_topic_model<T: TopicModel>() {}
        fn _assert_token_classifier<T: TokenClassifier>() {}
    }
}
