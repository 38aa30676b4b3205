// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-provider client cache.
//!
//! Each provider's client is built at most once per [`ClientCache`], on first
//! use, and shared afterwards. Concurrent first callers wait on the same
//! initialisation instead of racing to build duplicates.

use std::sync::Arc;

use mnemo_anthropic::AnthropicProvider;
use mnemo_config::MnemoConfig;
use mnemo_core::MnemoError;
use mnemo_core::traits::ChatProvider;
use mnemo_core::types::ModelProvider;
use mnemo_openai::OpenAiProvider;
use tokio::sync::OnceCell;
use tracing::info;

use crate::registry;

/// Builds the client for one provider.
pub type ClientFactory =
    Arc<dyn Fn(ModelProvider) -> Result<Arc<dyn ChatProvider>, MnemoError> + Send + Sync>;

/// Lazily constructed, shared provider clients.
pub struct ClientCache {
    openai: OnceCell<Arc<dyn ChatProvider>>,
    anthropic: OnceCell<Arc<dyn ChatProvider>>,
    factory: ClientFactory,
}

impl ClientCache {
    /// A cache building real HTTP clients from `config` (falling back to the
    /// provider environment variables for credentials).
    pub fn new(config: Arc<MnemoConfig>) -> Self {
        Self::with_factory(Arc::new(move |provider: ModelProvider| {
            default_client(&config, provider)
        }))
    }

    /// A cache building clients through `factory`.
    pub fn with_factory(factory: ClientFactory) -> Self {
        Self {
            openai: OnceCell::new(),
            anthropic: OnceCell::new(),
            factory,
        }
    }

    /// The shared client for `provider`, building it on first use.
    ///
    /// A failed build is not cached; the next call tries again.
    pub async fn get_client(
        &self,
        provider: ModelProvider,
    ) -> Result<Arc<dyn ChatProvider>, MnemoError> {
        let cell = match provider {
            ModelProvider::OpenAi => &self.openai,
            ModelProvider::Anthropic => &self.anthropic,
        };
        let client = cell
            .get_or_try_init(|| async {
                let client = (self.factory)(provider)?;
                info!(provider = %provider, "provider client created");
                Ok::<_, MnemoError>(client)
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// The shared client serving `model`, per the model registry.
    pub async fn get_client_for_model(
        &self,
        model: &str,
    ) -> Result<Arc<dyn ChatProvider>, MnemoError> {
        self.get_client(registry::resolve(model).provider).await
    }
}

fn default_client(
    config: &MnemoConfig,
    provider: ModelProvider,
) -> Result<Arc<dyn ChatProvider>, MnemoError> {
    let client: Arc<dyn ChatProvider> = match provider {
        ModelProvider::OpenAi => {
            let dims = registry::resolve(&config.models.embedding_model).embedding_dimensions;
            Arc::new(OpenAiProvider::new(config)?.with_embedding_dimensions(dims))
        }
        ModelProvider::Anthropic => Arc::new(AnthropicProvider::new(config)?),
    };
    Ok(client)
}
