// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page content fetching for summaries
//!
//! Fetches readable text for result URLs so the language model sees page
//! bodies rather than snippets alone.
//!
//! ## Architecture
//!
//! ```text
//! Result URLs → ContentFetcher → ReaderProxySource ─┐
//!                    ↓            DirectHtmlSource ──┴→ FetchedContent
//!              TtlCache (30min)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let fetcher = ContentFetcher::new(ContentFetchConfig::from_env())?;
//! let contents = fetcher.fetch_all(&urls).await;
//! ```

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod source;

pub use config::ContentFetchConfig;
pub use extractor::{extract_markdown, html_to_markdown, truncate_with_marker};
pub use fetcher::{ContentFetcher, FetchError, FetchedContent};
pub use source::{ContentSource, DirectHtmlSource, ReaderProxySource};
