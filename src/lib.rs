// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod inference;
pub mod search;
pub mod storage;
pub mod summary;
pub mod version;

pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use search::{SearchService, SearchParams};
pub use storage::{SearchStore, SqliteSearchStore};
pub use summary::{Summarizer, SummaryEvent};
