// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared in-process collaborators for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream;
use looq::inference::{GenerationError, ModelInfo, ModelList, TextGenerator, TextRequest, TextStream};
use looq::search::content::{ContentFetchConfig, ContentFetcher, ContentSource, FetchError};
use looq::search::{
    AutocompleteResponse, MetasearchProvider, MetasearchResponse, Reranker, SearchError,
    SearchParams, SearchResult,
};
use looq::storage::SearchStore;
use looq::summary::{Summarizer, SummarizerConfig, SummaryEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_MODEL: &str = "test-model";

pub fn result(url: &str, snippet: &str) -> SearchResult {
    SearchResult {
        url: url.to_string(),
        title: format!("Title of {}", url),
        content: Some(snippet.to_string()),
        engine: "duckduckgo".to_string(),
        engines: vec!["duckduckgo".to_string()],
        positions: vec![1],
        score: 1.0,
        category: "general".to_string(),
    }
}

/// Results with public URLs `https://site{i}.example.com/`
pub fn results(count: usize) -> Vec<SearchResult> {
    (1..=count)
        .map(|i| result(&format!("https://site{}.example.com/", i), &format!("snippet {}", i)))
        .collect()
}

/// Generator that streams fixed chunks, optionally failing after them
#[derive(Default)]
pub struct ScriptedGenerator {
    pub chunks: Vec<String>,
    pub fail_after_chunks: Option<String>,
    pub fail_on_start: Option<String>,
    pub prompts: Mutex<Vec<TextRequest>>,
    pub stream_calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn with_chunks(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_after(chunks: &[&str], error: &str) -> Self {
        Self {
            fail_after_chunks: Some(error.to_string()),
            ..Self::with_chunks(chunks)
        }
    }

    pub fn failing_on_start(status_body: &str) -> Self {
        Self {
            fail_on_start: Some(status_body.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn stream_text(&self, request: TextRequest) -> Result<TextStream, GenerationError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request);

        if let Some(body) = &self.fail_on_start {
            return Err(GenerationError::Status {
                status: 503,
                body: body.clone(),
            });
        }

        let mut items: Vec<Result<String, GenerationError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        if let Some(error) = &self.fail_after_chunks {
            items.push(Err(GenerationError::Stream(error.clone())));
        }
        Ok(Box::pin(stream::iter(items)))
    }

    async fn generate_json(
        &self,
        _model: &str,
        _prompt: &str,
    ) -> Result<serde_json::Value, GenerationError> {
        Ok(serde_json::json!({ "suggestions": ["generated one", "generated two"] }))
    }

    async fn list_models(&self) -> Result<ModelList, GenerationError> {
        Ok(ModelList {
            object: "list".to_string(),
            data: vec![ModelInfo {
                id: TEST_MODEL.to_string(),
                object: "model".to_string(),
                created: 1_700_000_000,
                owned_by: "test".to_string(),
            }],
        })
    }
}

/// Content source that serves canned bodies and records every URL asked for
///
/// Clones share the recorded URLs, so a test can keep one handle while the
/// fetcher owns another.
#[derive(Clone, Default)]
pub struct RecordingSource {
    pages: Arc<HashMap<String, String>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl RecordingSource {
    pub fn serving(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(u, c)| (u.to_string(), c.to_string()))
                    .collect(),
            ),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for RecordingSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus(404, url.to_string()))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Reranker that returns a fixed order
pub struct StaticReranker {
    pub ranked: Vec<String>,
}

#[async_trait]
impl Reranker for StaticReranker {
    async fn rerank(&self, _query: &str, _documents: &[String], top_n: usize) -> Vec<String> {
        self.ranked.iter().take(top_n).cloned().collect()
    }
}

/// Metasearch upstream with a canned response
pub struct StaticProvider {
    pub response: MetasearchResponse,
}

impl StaticProvider {
    pub fn with_results(query: &str, results: Vec<SearchResult>) -> Self {
        Self {
            response: MetasearchResponse {
                query: query.to_string(),
                number_of_results: results.len() as u64,
                results,
                infoboxes: None,
                suggestions: vec![],
            },
        }
    }
}

#[async_trait]
impl MetasearchProvider for StaticProvider {
    async fn search(&self, params: &SearchParams) -> Result<MetasearchResponse, SearchError> {
        let mut response = self.response.clone();
        response.query = params.q.clone();
        Ok(response)
    }

    async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse, SearchError> {
        Ok((query.to_string(), vec![format!("{} tutorial", query)]))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

pub fn fetcher_with(source: &RecordingSource) -> Arc<ContentFetcher> {
    Arc::new(ContentFetcher::with_sources(
        ContentFetchConfig::default(),
        vec![Box::new(source.clone())],
    ))
}

pub fn summarizer(
    store: Arc<dyn SearchStore>,
    source: &RecordingSource,
    generator: Arc<ScriptedGenerator>,
) -> Summarizer {
    Summarizer::new(
        store,
        fetcher_with(source),
        generator,
        SummarizerConfig {
            default_model: TEST_MODEL.to_string(),
            ..SummarizerConfig::default()
        },
    )
}

/// Drive a run to completion and collect every event
pub async fn collect_events(
    summarizer: &Summarizer,
    request_id: &str,
    model: Option<&str>,
) -> Vec<SummaryEvent> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(64);
    summarizer.run(request_id, model, tx).await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

pub fn terminal_count(events: &[SummaryEvent]) -> usize {
    events.iter().filter(|e| e.is_terminal()).count()
}
