// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Result summarization pipeline
//!
//! Resolves a stored search, reuses a cached summary for the same
//! `(query, model)` when one exists, and otherwise fetches page content,
//! builds a prompt and streams a generated summary back as events.

pub mod events;
pub mod prompt;
pub mod summarizer;

pub use events::SummaryEvent;
pub use prompt::build_prompt;
pub use summarizer::{Summarizer, SummarizerConfig, SummaryError};
