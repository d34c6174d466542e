// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SQLite DDL for the search store

use rusqlite::Connection;

/// Complete DDL; every statement is `IF NOT EXISTS` so applying it is idempotent
pub(crate) const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per search; only `summary` changes after insert.
CREATE TABLE IF NOT EXISTS search (
    id         TEXT PRIMARY KEY NOT NULL,
    query      TEXT NOT NULL,
    results    TEXT NOT NULL,       -- JSON array of results
    info_boxes TEXT,                -- JSON array of infoboxes
    created    INTEGER NOT NULL,
    summary    TEXT                 -- JSON {content, urls, model}
);

CREATE INDEX IF NOT EXISTS idx_search_query ON search(query);

-- Summary cache keyed by (query, model).
CREATE TABLE IF NOT EXISTS summaries (
    query      TEXT NOT NULL,
    model      TEXT NOT NULL,
    search_id  TEXT NOT NULL REFERENCES search(id),
    content    TEXT NOT NULL,
    urls       TEXT NOT NULL DEFAULT '[]',
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (query, model)
);
"#;

pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
