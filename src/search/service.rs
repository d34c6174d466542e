// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search service orchestration
//!
//! Runs the metasearch query, back-fills suggestions when the upstream
//! returned too few, and persists the result set so a summary can be
//! requested for it later.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::provider::MetasearchProvider;
use super::suggestions::SuggestionGenerator;
use super::types::{AutocompleteResponse, MetasearchResponse, SearchError, SearchParams};
use crate::storage::SearchStore;

/// A completed search and the id it was stored under
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub request_id: String,
    pub response: MetasearchResponse,
}

pub struct SearchService {
    provider: Arc<dyn MetasearchProvider>,
    store: Arc<dyn SearchStore>,
    suggestions: SuggestionGenerator,
    min_suggestions: usize,
}

impl SearchService {
    pub fn new(
        provider: Arc<dyn MetasearchProvider>,
        store: Arc<dyn SearchStore>,
        suggestions: SuggestionGenerator,
        min_suggestions: usize,
    ) -> Self {
        Self {
            provider,
            store,
            suggestions,
            min_suggestions,
        }
    }

    /// Search, back-fill suggestions, and store the result set
    pub async fn search(&self, params: &SearchParams) -> Result<SearchOutcome, SearchError> {
        params.validate()?;
        let start = Instant::now();

        let mut response = self.provider.search(params).await?;
        info!(
            "Search complete: {} results from {} in {}ms",
            response.results.len(),
            self.provider.name(),
            start.elapsed().as_millis()
        );

        if response.suggestions.len() < self.min_suggestions {
            debug!(
                "Only {} upstream suggestions, generating replacements",
                response.suggestions.len()
            );
            let context = response.snippets().join("\n\n-");
            response.suggestions = self.suggestions.suggest(&params.q, &context).await;
        }

        let request_id = self
            .store
            .create_search(
                &params.q,
                response.results.clone(),
                response.infoboxes.clone(),
            )
            .await
            .map_err(|e| SearchError::Store(e.to_string()))?;

        Ok(SearchOutcome {
            request_id,
            response,
        })
    }

    /// Completions for a partial query
    pub async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse, SearchError> {
        self.provider.autocomplete(query).await
    }
}
