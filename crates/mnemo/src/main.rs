// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mnemo - topic, entity, and memory extraction for long-term memory stores.
//!
//! This is the binary entry point.

mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mnemo - extraction and enrichment for long-term memory.
#[derive(Parser, Debug)]
#[command(name = "mnemo", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every model in the registry.
    Models,
    /// Show which provider and limits a model name resolves to.
    Resolve {
        /// Model name, e.g. `claude-3-5-sonnet-latest`.
        model: String,
    },
    /// Extract topic labels from text.
    Topics {
        text: String,
        /// Number of topics (defaults to `extraction.top_k_topics`).
        #[arg(long, short = 'n')]
        count: Option<usize>,
    },
    /// Extract named entities from text.
    Entities { text: String },
    /// Run every enabled extractor and print the enriched record.
    Enrich {
        text: String,
        /// Record id (a fresh id is generated when omitted).
        #[arg(long)]
        id: Option<String>,
    },
    /// Embed texts with the configured embedding model.
    Embed {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => mnemo_config::load_and_validate_path(path),
        None => mnemo_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            mnemo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    logging::init_tracing(&config.logging);

    let Some(command) = cli.command else {
        println!("mnemo: use --help for available commands");
        return;
    };

    if let Err(e) = commands::run(command, config).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("mnemo: {e}");
        std::process::exit(1);
    }
}
