// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Network-facing adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility. Local models are plain
//! synchronous traits.

pub mod adapter;
pub mod model;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use model::{TokenClassifier, TopicModel};
pub use provider::ChatProvider;
pub use storage::{MemoryIndexer, StorageAdapter};
