// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for Mnemo integration tests.
//!
//! Deterministic stand-ins for every external collaborator of the extraction
//! pipeline, so tests run without network access or model files.
//!
//! # Components
//!
//! - [`MockChatProvider`] - scripted chat replies, recorded requests
//! - [`InMemoryStorage`] - storage adapter and indexer over a `Vec`
//! - [`MockTopicModel`] / [`MockTokenClassifier`] - fixed local-model output

pub mod mock_models;
pub mod mock_provider;
pub mod mock_storage;

pub use mock_models::{MockTokenClassifier, MockTopicModel};
pub use mock_provider::{MockChatProvider, MockReply};
pub use mock_storage::InMemoryStorage;
