// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persistence of search records and generated summaries

pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod store;
pub mod types;

use std::env;
use std::path::PathBuf;

// Re-export main types for convenience
pub use memory::MemorySearchStore;
pub use sqlite::SqliteSearchStore;
pub use store::SearchStore;
pub use types::{SearchRecord, StoreError, Summary};

/// Store location
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite file; `:memory:` keeps everything in process
    pub database_path: PathBuf,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Self::default().database_path),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }

    /// Open the configured SQLite store
    pub fn open(&self) -> Result<SqliteSearchStore, StoreError> {
        if self.is_in_memory() {
            SqliteSearchStore::in_memory()
        } else {
            SqliteSearchStore::open(&self.database_path)
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("looq.db"),
        }
    }
}
