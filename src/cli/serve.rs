// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use tracing::info;

use crate::api::start_server;
use crate::config::AppConfig;
use crate::version;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (overrides API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides API_PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let addr = config.server.socket_addr().map_err(|e| anyhow!(e))?;
    let state = super::build_state(&config)?;

    info!("Starting {}", version::get_version_string());
    info!("Metasearch upstream: {}", config.search.searxng_url);
    info!("Default model: {}", config.generation.default_model);

    start_server(addr, state).await
}
