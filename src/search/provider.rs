// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Metasearch provider trait definition

use async_trait::async_trait;

use super::types::{AutocompleteResponse, MetasearchResponse, SearchError, SearchParams};

/// Upstream that answers queries and completions
///
/// The production implementation is [`super::searxng::SearxngClient`]; tests
/// substitute canned responses.
#[async_trait]
pub trait MetasearchProvider: Send + Sync {
    /// Run a query and return the validated result set
    async fn search(&self, params: &SearchParams) -> Result<MetasearchResponse, SearchError>;

    /// Completions for a partial query
    async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
