// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the metasearch upstream
//!
//! These mirror the JSON payload returned by a SearXNG instance with
//! `format=json`. Deserialization is the schema check: a payload missing a
//! required field is rejected, never coerced.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single ranked hit returned by the metasearch service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// URL of the hit
    pub url: String,
    /// Title of the hit
    pub title: String,
    /// Snippet text, when the engine supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Engine that ranked this hit first
    pub engine: String,
    /// Every engine that returned this hit
    pub engines: Vec<String>,
    /// Positions of the hit in each engine's list
    pub positions: Vec<u32>,
    /// Aggregated relevance score
    pub score: f64,
    /// Category label (e.g. "general")
    pub category: String,
}

/// A link attached to an infobox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoBoxUrl {
    pub title: String,
    pub url: String,
}

/// Contextual panel provided by the metasearch service (Wikipedia etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoBox {
    /// Panel title
    pub infobox: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub urls: Vec<InfoBoxUrl>,
}

/// Full result set for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetasearchResponse {
    /// The query as understood by the upstream
    pub query: String,
    pub number_of_results: u64,
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infoboxes: Option<Vec<InfoBox>>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl MetasearchResponse {
    /// Snippets of every result that has one, in rank order
    pub fn snippets(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|r| r.content.clone())
            .collect()
    }
}

/// Query parameters accepted by `/api/search` and forwarded upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search query string (required, max 500 chars)
    pub q: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    #[serde(default = "default_safesearch")]
    pub safesearch: String,
    #[serde(default = "default_categories")]
    pub categories: String,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_safesearch() -> String {
    "0".to_string()
}

fn default_categories() -> String {
    "general".to_string()
}

impl SearchParams {
    /// Parameters for a plain query with every other field at its default
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            language: default_language(),
            time_range: None,
            safesearch: default_safesearch(),
            categories: default_categories(),
        }
    }

    /// Validate the request
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.q.trim().is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "Query cannot be empty".to_string(),
            });
        }
        if self.q.chars().count() > 500 {
            return Err(SearchError::InvalidQuery {
                reason: "Query too long (max 500 characters)".to_string(),
            });
        }
        Ok(())
    }

    /// Upstream query pairs, always requesting JSON output
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", self.q.clone()),
            ("language", self.language.clone()),
            ("safesearch", self.safesearch.clone()),
            ("categories", self.categories.clone()),
        ];
        if let Some(ref range) = self.time_range {
            pairs.push(("time_range", range.clone()));
        }
        pairs.push(("format", "json".to_string()));
        pairs
    }
}

/// `[query, [completions...]]` as returned by the autocompleter endpoint
pub type AutocompleteResponse = (String, Vec<String>);

/// Errors that can occur while talking to the metasearch service
#[derive(Debug, Error)]
pub enum SearchError {
    /// Outbound quota exhausted
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Non-success status from the upstream
    #[error("Fetch failed with status: {status}")]
    ApiError { status: u16, message: String },

    /// Payload did not match the expected schema
    #[error("Invalid upstream response: {0}")]
    Validation(String),

    /// Upstream could not be reached
    #[error("Metasearch request failed: {0}")]
    Http(String),

    /// Invalid search query
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Persisting the search record failed
    #[error("Failed to store search: {0}")]
    Store(String),
}
