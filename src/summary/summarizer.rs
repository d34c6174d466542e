// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Streaming summarizer
//!
//! ```text
//! Idle → CacheCheck ─┬→ CacheHit → Emitting → Done
//!                    └→ CacheMiss → Fetching → Prompting → Generating
//!                                 → Emitting → Persisting → Done
//! any error ──────────────────────────────────────────────→ Failed
//! ```
//!
//! Every run sends exactly one terminal event (`Done` or `Error`), always
//! last. If the receiver goes away mid-run the task stops quietly and does
//! not persist a partial summary.

use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::events::SummaryEvent;
use super::prompt::build_prompt;
use crate::inference::{GenerationError, TextGenerator, TextRequest, DEFAULT_MODEL};
use crate::search::content::{ContentFetcher, FetchedContent};
use crate::search::rerank::Reranker;
use crate::storage::{SearchStore, StoreError, Summary};

/// Capacity of the event channel between the summarizer task and the response
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Search not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Used when the request names no model
    pub default_model: String,
    /// Output token cap for generation
    pub max_tokens: u32,
    /// Fetched pages kept after reranking
    pub rerank_top_n: usize,
}

impl SummarizerConfig {
    /// The requested model, or the default when absent or blank
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim) {
            Some(model) if !model.is_empty() => model.to_string(),
            _ => self.default_model.clone(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            rerank_top_n: 3,
        }
    }
}

/// How a run ended without error
enum Outcome {
    Completed { sources: Vec<String> },
    Disconnected,
}

pub struct Summarizer {
    store: Arc<dyn SearchStore>,
    fetcher: Arc<ContentFetcher>,
    generator: Arc<dyn TextGenerator>,
    reranker: Option<Arc<dyn Reranker>>,
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(
        store: Arc<dyn SearchStore>,
        fetcher: Arc<ContentFetcher>,
        generator: Arc<dyn TextGenerator>,
        config: SummarizerConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            generator,
            reranker: None,
            config,
        }
    }

    /// Rerank fetched pages before they go into the prompt
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Run in a background task and return the event receiver
    pub fn spawn(
        self: &Arc<Self>,
        request_id: String,
        model: Option<String>,
    ) -> mpsc::Receiver<SummaryEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let summarizer = Arc::clone(self);
        tokio::spawn(async move {
            summarizer.run(&request_id, model.as_deref(), tx).await;
        });
        rx
    }

    /// Produce the summary for a stored search, sending events into `sink`
    pub async fn run(&self, request_id: &str, model: Option<&str>, sink: mpsc::Sender<SummaryEvent>) {
        let model = self.config.resolve_model(model);

        let terminal = match self.try_run(request_id, &model, &sink).await {
            Ok(Outcome::Completed { sources }) => SummaryEvent::Done { sources },
            Ok(Outcome::Disconnected) => {
                debug!("Client disconnected during summary of {}", request_id);
                return;
            }
            Err(e) => {
                warn!("Summary of {} failed: {}", request_id, e);
                SummaryEvent::Error {
                    error: e.to_string(),
                }
            }
        };

        if sink.send(terminal).await.is_err() {
            debug!("Client disconnected before terminal event for {}", request_id);
        }
    }

    async fn try_run(
        &self,
        request_id: &str,
        model: &str,
        sink: &mpsc::Sender<SummaryEvent>,
    ) -> Result<Outcome, SummaryError> {
        let record = self
            .store
            .get_search(request_id)
            .await?
            .ok_or_else(|| SummaryError::NotFound(request_id.to_string()))?;

        match self
            .store
            .find_summary_by_query_and_model(&record.query, model)
            .await
        {
            Ok(Some(cached)) => {
                info!("Summary cache hit for '{}' with {}", record.query, model);
                let event = SummaryEvent::Content {
                    content: cached.content,
                };
                if sink.send(event).await.is_err() {
                    return Ok(Outcome::Disconnected);
                }
                return Ok(Outcome::Completed {
                    sources: cached.urls,
                });
            }
            Ok(None) => debug!("Summary cache miss for '{}' with {}", record.query, model),
            Err(e) => warn!("Summary cache lookup failed, generating anyway: {}", e),
        }

        let fetched = self.fetcher.fetch_all(&record.result_urls()).await;
        let contents = self.select_contents(&record.query, fetched).await;
        let sources: Vec<String> = contents.iter().map(|c| c.url.clone()).collect();

        let prompt = build_prompt(
            &record.query,
            &record.info_box_titles(),
            &record.snippets(),
            &contents,
        );

        info!("Generating summary with model: {}", model);
        let mut stream = self
            .generator
            .stream_text(TextRequest {
                model: model.to_string(),
                prompt,
                max_tokens: self.config.max_tokens,
            })
            .await?;

        let mut cumulative = String::new();
        let mut emitted = false;
        while let Some(chunk) = stream.next().await {
            cumulative.push_str(&chunk?);
            let event = SummaryEvent::Content {
                content: cumulative.clone(),
            };
            if sink.send(event).await.is_err() {
                return Ok(Outcome::Disconnected);
            }
            emitted = true;
        }

        if !emitted {
            let event = SummaryEvent::Content {
                content: String::new(),
            };
            if sink.send(event).await.is_err() {
                return Ok(Outcome::Disconnected);
            }
        }

        let summary = Summary {
            content: cumulative,
            urls: sources.clone(),
            model: model.to_string(),
        };
        if let Err(e) = self.store.attach_summary(&record.id, summary).await {
            warn!("Failed to persist summary for {}: {}", record.id, e);
        }

        Ok(Outcome::Completed { sources })
    }

    /// Rerank fetched pages when a reranker is configured, keeping their URLs
    async fn select_contents(
        &self,
        query: &str,
        fetched: Vec<FetchedContent>,
    ) -> Vec<FetchedContent> {
        let Some(reranker) = &self.reranker else {
            return fetched;
        };
        if fetched.is_empty() {
            return fetched;
        }

        let top_n = self.config.rerank_top_n;
        let texts: Vec<String> = fetched.iter().map(|c| c.content.clone()).collect();
        let ranked = reranker.rerank(query, &texts, top_n).await;
        match_ranked(fetched, ranked, top_n)
    }
}

/// Pair reranked texts back with their pages
///
/// Texts the reranker altered cannot be matched; if nothing matches, the
/// first `top_n` pages are kept.
fn match_ranked(
    fetched: Vec<FetchedContent>,
    ranked: Vec<String>,
    top_n: usize,
) -> Vec<FetchedContent> {
    let mut remaining = fetched.clone();
    let selected: Vec<FetchedContent> = ranked
        .iter()
        .filter_map(|text| {
            let pos = remaining.iter().position(|c| &c.content == text)?;
            Some(remaining.remove(pos))
        })
        .collect();

    if selected.is_empty() {
        fetched.into_iter().take(top_n).collect()
    } else {
        selected
    }
}
