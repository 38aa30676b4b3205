// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model lookup and provider client routing for the Mnemo pipeline.
//!
//! This crate provides:
//! - [`resolve`]: model name to static [`ModelConfig`](mnemo_core::ModelConfig), never failing
//! - [`ClientCache`]: one lazily built client per provider, shared by every caller

pub mod clients;
pub mod registry;

pub use clients::{ClientCache, ClientFactory};
pub use registry::{DEFAULT_MODEL, all_models, is_known, resolve};
