// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod search;
pub mod serve;
pub mod summarize;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use crate::api::AppState;
use crate::config::AppConfig;

/// Looq metasearch and summary service
#[derive(Parser, Debug)]
#[command(name = "looq")]
#[command(version)]
#[command(about = "Metasearch proxy with streamed AI summaries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve(serve::ServeArgs),

    /// Run one search and print the stored result set
    Search(search::SearchArgs),

    /// Stream the summary of a stored search to stdout
    Summarize(summarize::SummarizeArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env();
    match cli.command {
        Commands::Serve(args) => serve::run(args, config).await,
        Commands::Search(args) => search::run(args, config).await,
        Commands::Summarize(args) => summarize::run(args, config).await,
    }
}

/// Validate configuration and wire the services
pub(crate) fn build_state(config: &AppConfig) -> Result<AppState> {
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    AppState::from_config(config)
}
