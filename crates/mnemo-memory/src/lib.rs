// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic, entity, and discrete memory extraction for Mnemo.
//!
//! [`ExtractionPipeline`] is the entry point. It combines:
//! - topic extraction, either statistical ([`CentroidTopicModel`] over local
//!   MiniLM embeddings) or LLM-backed
//! - best-effort named entity extraction with a BERT token classifier
//! - discrete memory synthesis over stored messages
//!
//! Local ONNX models are downloaded on first use by [`ModelManager`].

pub mod cache;
pub mod discrete;
pub mod embedder;
pub mod entities;
pub mod lazy;
pub mod model_manager;
pub mod ner;
mod onnx;
pub mod pipeline;
pub mod prompts;
pub mod topic_model;
pub mod topics;
pub mod types;

pub use cache::ExtractionCache;
pub use discrete::{DiscreteExtractor, DiscreteSettings};
pub use embedder::{EMBEDDING_DIM, OnnxEmbedder, SentenceEmbedder};
pub use entities::{EntityExtractor, dedupe_preserving_order, group_wordpiece_tokens};
pub use lazy::{LazyModel, ModelLoader};
pub use model_manager::ModelManager;
pub use ner::OnnxTokenClassifier;
pub use pipeline::ExtractionPipeline;
pub use topic_model::CentroidTopicModel;
pub use topics::{LlmTopics, StatisticalTopics, TopicExtractor};
pub use types::{DiscreteExtractionReport, ExtractedMemory, ExtractionPolicy};
