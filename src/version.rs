// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the looq service

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "searxng-metasearch",
    "cloudflare-access",
    "autocomplete-cache",
    "suggestion-backfill",
    "streaming-summaries",
    "summary-cache",
    "reader-proxy-content",
    "html-fallback-content",
    "rerank",
];

/// Human-readable version line
pub fn get_version_string() -> String {
    format!("{} v{}", SERVICE_NAME, VERSION)
}
