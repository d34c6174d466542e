// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{autocomplete_handler, health_handler, models_handler};
use super::search::search_handler;
use super::summary::summary_handler;
use crate::config::AppConfig;
use crate::inference::{OpenAiClient, TextGenerator};
use crate::search::{
    ContentFetcher, JinaReranker, SearchService, SearxngClient, SuggestionGenerator,
};
use crate::storage::SearchStore;
use crate::summary::{Summarizer, SummarizerConfig};

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub summarizer: Arc<Summarizer>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Wire every service from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn SearchStore> = Arc::new(
            config
                .store
                .open()
                .with_context(|| format!("opening {}", config.store.database_path.display()))?,
        );
        let generator: Arc<dyn TextGenerator> =
            Arc::new(OpenAiClient::new(&config.generation).context("building generation client")?);

        let provider = Arc::new(SearxngClient::new(&config.search).context("building search client")?);
        let suggestions = SuggestionGenerator::new(
            Arc::clone(&generator),
            config.generation.suggestion_model.clone(),
        );
        let search = SearchService::new(
            provider,
            Arc::clone(&store),
            suggestions,
            config.search.min_suggestions,
        );

        let fetcher = Arc::new(
            ContentFetcher::new(config.content.clone()).context("building content fetcher")?,
        );
        let mut summarizer = Summarizer::new(
            Arc::clone(&store),
            fetcher,
            Arc::clone(&generator),
            SummarizerConfig {
                default_model: config.generation.default_model.clone(),
                max_tokens: config.generation.max_tokens,
                rerank_top_n: config.rerank.top_n,
            },
        );
        if config.rerank.api_key.is_some() {
            let reranker =
                JinaReranker::new(config.rerank.clone()).context("building reranker")?;
            summarizer = summarizer.with_reranker(Arc::new(reranker));
        } else {
            tracing::info!("JINA_KEY not set, summaries use fetched pages without reranking");
        }

        Ok(Self {
            search: Arc::new(search),
            summarizer: Arc::new(summarizer),
            generator,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        .route("/api/search", get(search_handler))
        .route("/api/autocompleter", get(autocomplete_handler))
        .route("/api/summary", post(summary_handler))
        .route("/api/models", get(models_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
