// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persisted search records and summaries

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::types::{InfoBox, SearchResult};

/// One persisted search event
///
/// Everything except `summary` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: String,
    pub query: String,
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_boxes: Option<Vec<InfoBox>>,
    /// Seconds since epoch
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl SearchRecord {
    /// Result URLs in rank order
    pub fn result_urls(&self) -> Vec<String> {
        self.results.iter().map(|r| r.url.clone()).collect()
    }

    /// Result snippets in rank order, skipping results without one
    pub fn snippets(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|r| r.content.clone())
            .collect()
    }

    /// Infobox titles in order
    pub fn info_box_titles(&self) -> Vec<String> {
        self.info_boxes
            .iter()
            .flatten()
            .map(|b| b.infobox.clone())
            .collect()
    }
}

/// A generated summary and the sources it was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Markdown text
    pub content: String,
    pub urls: Vec<String>,
    /// Model that produced the text
    pub model: String,
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Search record not found: {0}")]
    NotFound(String),

    #[error("Store lock poisoned: {0}")]
    Lock(String),

    #[error("Store task failed: {0}")]
    Task(String),

    #[error("Store I/O error: {0}")]
    Io(String),
}
