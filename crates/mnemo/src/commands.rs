// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations. Every command prints JSON to stdout.

use std::sync::Arc;

use mnemo_config::MnemoConfig;
use mnemo_core::{ChatProvider, MnemoError};
use mnemo_core::types::{MemoryRecord, ModelConfig};
use mnemo_memory::ExtractionPipeline;
use mnemo_router::ClientCache;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::Commands;

pub async fn run(command: Commands, config: MnemoConfig) -> Result<(), MnemoError> {
    let config = Arc::new(config);

    match command {
        Commands::Models => print(&mnemo_router::all_models()),
        Commands::Resolve { model } => print(&resolution(&model)),
        Commands::Topics { text, count } => {
            let topics = pipeline(&config).extract_topics(&text, count).await?;
            print(&json!({ "topics": topics }))
        }
        Commands::Entities { text } => {
            let entities = pipeline(&config).extract_entities(&text).await;
            print(&json!({ "entities": entities }))
        }
        Commands::Enrich { text, id } => {
            let id = id.unwrap_or_else(|| Uuid::now_v7().to_string());
            let record = pipeline(&config)
                .enrich_record(MemoryRecord::message(id, text))
                .await?;
            print(&record)
        }
        Commands::Embed { texts } => {
            let clients = ClientCache::new(Arc::clone(&config));
            let model = &config.models.embedding_model;
            let client = clients.get_client_for_model(model).await?;
            let embeddings = client.create_embedding(&texts).await?;
            let rows: Vec<Vec<f32>> = embeddings.outer_iter().map(|row| row.to_vec()).collect();
            print(&json!({
                "model": model,
                "dimensions": embeddings.ncols(),
                "embeddings": rows,
            }))
        }
    }
}

fn pipeline(config: &Arc<MnemoConfig>) -> ExtractionPipeline {
    let clients = Arc::new(ClientCache::new(Arc::clone(config)));
    ExtractionPipeline::new(Arc::clone(config), clients)
}

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    requested: &'a str,
    #[serde(flatten)]
    model: &'static ModelConfig,
    fallback: bool,
}

fn resolution(requested: &str) -> Resolution<'_> {
    let model = mnemo_router::resolve(requested);
    Resolution {
        requested,
        model,
        fallback: !mnemo_router::is_known(requested),
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), MnemoError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| MnemoError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{out}");
    Ok(())
}
