// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persistence seam for search records and summaries

use async_trait::async_trait;

use super::types::{SearchRecord, StoreError, Summary};
use crate::search::types::{InfoBox, SearchResult};

/// Durable store of searches and their summaries
///
/// Summaries are looked up by `(query, model)`, not by record id, so any
/// record for the same query can reuse one. Concurrent attaches for the same
/// key are allowed; the last write wins.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Insert a new record and return its generated id
    async fn create_search(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        info_boxes: Option<Vec<InfoBox>>,
    ) -> Result<String, StoreError>;

    async fn get_search(&self, id: &str) -> Result<Option<SearchRecord>, StoreError>;

    async fn find_summary_by_query_and_model(
        &self,
        query: &str,
        model: &str,
    ) -> Result<Option<Summary>, StoreError>;

    /// Set the record's summary; `NotFound` when the id is unknown
    async fn attach_summary(&self, id: &str, summary: Summary) -> Result<(), StoreError>;
}
