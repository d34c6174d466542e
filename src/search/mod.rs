// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Metasearch, page content, reranking and suggestions
//!
//! Provides everything upstream of the summarizer:
//! - SearXNG queries and autocomplete, optionally behind Cloudflare Access
//! - Page content fetching with a reader proxy and local HTML fallback
//! - Best-effort relevance reranking
//! - Generated suggestions when the upstream returns too few

pub mod cache;
pub mod config;
pub mod content;
pub mod provider;
pub mod rate_limiter;
pub mod rerank;
pub mod searxng;
pub mod service;
pub mod suggestions;
pub mod types;

// Re-export commonly used types
pub use config::{AccessCredentials, SearchConfig};
pub use content::{ContentFetchConfig, ContentFetcher, FetchedContent};
pub use provider::MetasearchProvider;
pub use rerank::{JinaReranker, RerankConfig, Reranker};
pub use searxng::SearxngClient;
pub use service::{SearchOutcome, SearchService};
pub use suggestions::SuggestionGenerator;
pub use types::{
    AutocompleteResponse, InfoBox, InfoBoxUrl, MetasearchResponse, SearchError, SearchParams,
    SearchResult,
};
