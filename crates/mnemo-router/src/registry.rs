// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static table of known models.
//!
//! Lookup is total: an unknown name resolves to [`DEFAULT_MODEL`] with a
//! warning, so a misconfigured model name degrades instead of failing.

use mnemo_core::types::{ModelConfig, ModelProvider};
use tracing::warn;

/// Model used for names the registry does not know.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const OPENAI_EMBEDDING_DIMS: usize = 1536;

const fn openai(name: &'static str, max_tokens: u32) -> ModelConfig {
    ModelConfig {
        provider: ModelProvider::OpenAi,
        name,
        max_tokens,
        embedding_dimensions: OPENAI_EMBEDDING_DIMS,
    }
}

const fn anthropic(name: &'static str) -> ModelConfig {
    ModelConfig {
        provider: ModelProvider::Anthropic,
        name,
        max_tokens: 200_000,
        embedding_dimensions: OPENAI_EMBEDDING_DIMS,
    }
}

static MODELS: &[ModelConfig] = &[
    openai("gpt-3.5-turbo", 4096),
    openai("gpt-3.5-turbo-16k", 16384),
    openai("gpt-4", 8192),
    openai("gpt-4-32k", 32768),
    openai("gpt-4o", 128_000),
    openai("gpt-4o-mini", 128_000),
    openai("o1", 200_000),
    openai("o1-mini", 128_000),
    openai("o3-mini", 200_000),
    openai("text-embedding-ada-002", 8191),
    openai("text-embedding-3-small", 8191),
    ModelConfig {
        provider: ModelProvider::OpenAi,
        name: "text-embedding-3-large",
        max_tokens: 8191,
        embedding_dimensions: 3072,
    },
    anthropic("claude-3-opus-20240229"),
    anthropic("claude-3-sonnet-20240229"),
    anthropic("claude-3-haiku-20240307"),
    anthropic("claude-3-5-sonnet-20240620"),
    anthropic("claude-3-5-sonnet-20241022"),
    anthropic("claude-3-5-haiku-20241022"),
    anthropic("claude-3-7-sonnet-20250219"),
];

static FALLBACK: ModelConfig = openai(DEFAULT_MODEL, 128_000);

/// Maps a floating `-latest` alias to its dated model name.
fn canonical_name(name: &str) -> &str {
    match name {
        "claude-3-7-sonnet-latest" => "claude-3-7-sonnet-20250219",
        "claude-3-5-sonnet-latest" => "claude-3-5-sonnet-20241022",
        "claude-3-5-haiku-latest" => "claude-3-5-haiku-20241022",
        "claude-3-opus-latest" => "claude-3-opus-20240229",
        other => other,
    }
}

fn lookup(name: &str) -> Option<&'static ModelConfig> {
    let canonical = canonical_name(name);
    MODELS.iter().find(|m| m.name == canonical)
}

/// Resolves a model name, falling back to [`DEFAULT_MODEL`] for unknown names.
pub fn resolve(name: &str) -> &'static ModelConfig {
    if let Some(config) = lookup(name) {
        return config;
    }
    warn!(model = name, fallback = DEFAULT_MODEL, "unknown model, using default");
    lookup(DEFAULT_MODEL).unwrap_or(&FALLBACK)
}

/// Whether `name` (or the alias it stands for) is in the table.
pub fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

/// Every registered model, in table order.
pub fn all_models() -> &'static [ModelConfig] {
    MODELS
}
