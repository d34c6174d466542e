// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory search store for tests and ephemeral runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::SearchStore;
use super::types::{SearchRecord, StoreError, Summary};
use crate::search::types::{InfoBox, SearchResult};

#[derive(Default)]
struct Inner {
    records: HashMap<String, SearchRecord>,
    summaries: HashMap<(String, String), Summary>,
}

#[derive(Clone, Default)]
pub struct MemorySearchStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemorySearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

#[async_trait]
impl SearchStore for MemorySearchStore {
    async fn create_search(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        info_boxes: Option<Vec<InfoBox>>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let record = SearchRecord {
            id: id.clone(),
            query: query.to_string(),
            results,
            info_boxes,
            created_at: chrono::Utc::now().timestamp(),
            summary: None,
        };
        self.inner.write().await.records.insert(id.clone(), record);
        Ok(id)
    }

    async fn get_search(&self, id: &str) -> Result<Option<SearchRecord>, StoreError> {
        Ok(self.inner.read().await.records.get(id).cloned())
    }

    async fn find_summary_by_query_and_model(
        &self,
        query: &str,
        model: &str,
    ) -> Result<Option<Summary>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .summaries
            .get(&(query.to_string(), model.to_string()))
            .cloned())
    }

    async fn attach_summary(&self, id: &str, summary: Summary) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.summary = Some(summary.clone());
        let key = (record.query.clone(), summary.model.clone());
        inner.summaries.insert(key, summary);
        Ok(())
    }
}
