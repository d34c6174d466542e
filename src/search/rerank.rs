// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relevance reranking of fetched page content
//!
//! Reranking is best effort: every failure path returns the first `top_n`
//! documents unchanged, so callers never see an error.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

/// Reranker settings
#[derive(Debug, Clone)]
pub struct RerankConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Documents kept after reranking (default: 3)
    pub top_n: usize,
    pub timeout_secs: u64,
}

impl RerankConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("JINA_RERANK_URL").unwrap_or(defaults.url),
            api_key: env::var("JINA_KEY").ok().filter(|k| !k.is_empty()),
            model: env::var("RERANK_MODEL").unwrap_or(defaults.model),
            top_n: env::var("RERANK_TOP_N")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.top_n),
            timeout_secs: defaults.timeout_secs,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.top_n == 0 {
            return Err("RERANK_TOP_N must be at least 1".to_string());
        }
        url::Url::parse(&self.url).map_err(|e| format!("Invalid JINA_RERANK_URL: {}", e))?;
        Ok(())
    }
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            url: "https://api.jina.ai/v1/rerank".to_string(),
            api_key: None,
            model: "jina-reranker-v2-base-multilingual".to_string(),
            top_n: 3,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    top_n: usize,
    documents: &'a [String],
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    #[allow(dead_code)]
    model: String,
    #[allow(dead_code)]
    usage: RerankUsage,
    results: Vec<RerankResult>,
}

#[derive(Debug, Deserialize)]
struct RerankUsage {
    #[allow(dead_code)]
    total_tokens: u64,
    #[allow(dead_code)]
    prompt_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct RerankResult {
    #[allow(dead_code)]
    index: usize,
    document: RerankDocument,
    #[allow(dead_code)]
    relevance_score: f64,
}

#[derive(Debug, Deserialize)]
struct RerankDocument {
    text: String,
}

/// Orders documents by relevance to a query
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Most relevant `top_n` documents, best first
    async fn rerank(&self, query: &str, documents: &[String], top_n: usize) -> Vec<String>;
}

/// Keep the first `top_n` documents as given
pub fn first_n(documents: &[String], top_n: usize) -> Vec<String> {
    documents.iter().take(top_n).cloned().collect()
}

/// Client for a Jina-compatible `/v1/rerank` endpoint
pub struct JinaReranker {
    client: Client,
    config: RerankConfig,
}

impl JinaReranker {
    pub fn new(config: RerankConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    async fn try_rerank(
        &self,
        api_key: &str,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<String>, String> {
        let request = RerankRequest {
            model: &self.config.model,
            query,
            top_n,
            documents,
        };

        let response = self
            .client
            .post(&self.config.url)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Fetch failed with status: {}", status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| e.to_string())?;
        let parsed: RerankResponse =
            serde_json::from_slice(&body).map_err(|e| format!("invalid rerank response: {}", e))?;

        Ok(parsed
            .results
            .into_iter()
            .map(|r| r.document.text)
            .take(top_n)
            .collect())
    }
}

#[async_trait]
impl Reranker for JinaReranker {
    async fn rerank(&self, query: &str, documents: &[String], top_n: usize) -> Vec<String> {
        if documents.is_empty() {
            return Vec::new();
        }

        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("No rerank key configured, keeping first {} documents", top_n);
            return first_n(documents, top_n);
        };

        match self.try_rerank(api_key, query, documents, top_n).await {
            Ok(ranked) => {
                debug!("Reranked {} documents to {}", documents.len(), ranked.len());
                ranked
            }
            Err(e) => {
                warn!("Error calling rerank API: {}", e);
                first_n(documents, top_n)
            }
        }
    }
}
