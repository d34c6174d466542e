// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SQLite-backed search store
//!
//! A single connection behind a mutex; every call runs on the blocking pool
//! so the async runtime never waits on disk I/O.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

use super::schema::apply_schema;
use super::store::SearchStore;
use super::types::{SearchRecord, StoreError, Summary};
use crate::search::types::{InfoBox, SearchResult};

#[derive(Clone)]
pub struct SqliteSearchStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSearchStore {
    /// Open (or create) the database file and apply the schema
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        apply_schema(&conn)?;
        debug!("Opened search store at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|e| StoreError::Lock(e.to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl SearchStore for SqliteSearchStore {
    async fn create_search(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        info_boxes: Option<Vec<InfoBox>>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let query = query.to_string();
        let results_json = serde_json::to_string(&results)?;
        let info_boxes_json = info_boxes
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let created = chrono::Utc::now().timestamp();

        let record_id = id.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO search (id, query, results, info_boxes, created) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![record_id, query, results_json, info_boxes_json, created],
            )?;
            Ok(())
        })
        .await?;

        Ok(id)
    }

    async fn get_search(&self, id: &str) -> Result<Option<SearchRecord>, StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, query, results, info_boxes, created, summary FROM search WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Option<String>>(3)?,
                            row.get::<_, i64>(4)?,
                            row.get::<_, Option<String>>(5)?,
                        ))
                    },
                )
                .optional()?;

            let Some((id, query, results, info_boxes, created_at, summary)) = row else {
                return Ok(None);
            };

            Ok(Some(SearchRecord {
                id,
                query,
                results: serde_json::from_str(&results)?,
                info_boxes: info_boxes.as_deref().map(serde_json::from_str).transpose()?,
                created_at,
                summary: summary.as_deref().map(serde_json::from_str).transpose()?,
            }))
        })
        .await
    }

    async fn find_summary_by_query_and_model(
        &self,
        query: &str,
        model: &str,
    ) -> Result<Option<Summary>, StoreError> {
        let query = query.to_string();
        let model = model.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT content, urls, model FROM summaries WHERE query = ?1 AND model = ?2",
                    params![query, model],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;

            row.map(|(content, urls, model)| {
                Ok(Summary {
                    content,
                    urls: serde_json::from_str(&urls)?,
                    model,
                })
            })
            .transpose()
        })
        .await
    }

    async fn attach_summary(&self, id: &str, summary: Summary) -> Result<(), StoreError> {
        let id = id.to_string();
        let summary_json = serde_json::to_string(&summary)?;
        let urls_json = serde_json::to_string(&summary.urls)?;
        let now = chrono::Utc::now().timestamp();

        self.with_conn(move |conn| {
            let tx = conn.unchecked_transaction()?;

            let updated = tx.execute(
                "UPDATE search SET summary = ?1 WHERE id = ?2",
                params![summary_json, id],
            )?;
            if updated == 0 {
                return Err(StoreError::NotFound(id));
            }

            tx.execute(
                "INSERT INTO summaries (query, model, search_id, content, urls, updated_at) \
                 SELECT query, ?2, id, ?3, ?4, ?5 FROM search WHERE id = ?1 \
                 ON CONFLICT (query, model) DO UPDATE SET \
                   search_id = excluded.search_id, \
                   content = excluded.content, \
                   urls = excluded.urls, \
                   updated_at = excluded.updated_at",
                params![id, summary.model, summary.content, urls_json, now],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
    }
}
