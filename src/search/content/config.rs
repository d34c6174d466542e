// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for content fetching
//!
//! Defines settings for page fetching, content limits, and caching.

use std::env;

/// Configuration for content fetching
#[derive(Debug, Clone)]
pub struct ContentFetchConfig {
    /// Maximum pages fetched per summary; further URLs are dropped (default: 5)
    pub max_pages: usize,
    /// Character budget for text returned by the reader proxy (default: 3000)
    pub max_chars_per_page: usize,
    /// Character budget for locally converted HTML (default: 500)
    pub fallback_max_chars: usize,
    /// Timeout in seconds for each source attempt on a page (default: 10)
    pub timeout_per_page_secs: u64,
    /// Cache TTL in seconds (default: 1800 = 30 minutes)
    pub cache_ttl_secs: u64,
    /// Maximum cache entries (default: 500)
    pub max_cache_entries: usize,
    /// Reader proxy prefix; the page URL is appended. `None` disables it.
    pub reader_url: Option<String>,
    /// Bearer key for the reader proxy
    pub reader_api_key: Option<String>,
}

impl ContentFetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_pages: env::var("CONTENT_FETCH_MAX_PAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_pages)
                .min(10),
            max_chars_per_page: env::var("CONTENT_FETCH_MAX_CHARS_PER_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_chars_per_page),
            fallback_max_chars: env::var("CONTENT_FETCH_FALLBACK_MAX_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fallback_max_chars),
            timeout_per_page_secs: env::var("CONTENT_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_per_page_secs),
            cache_ttl_secs: env::var("CONTENT_FETCH_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            max_cache_entries: defaults.max_cache_entries,
            // An explicitly empty JINA_READER_URL turns the proxy off
            reader_url: match env::var("JINA_READER_URL") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(v),
                Err(_) => defaults.reader_url,
            },
            reader_api_key: env::var("JINA_KEY").ok().filter(|k| !k.is_empty()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_pages == 0 {
            return Err("max_pages must be at least 1".to_string());
        }
        if self.fallback_max_chars == 0 || self.max_chars_per_page == 0 {
            return Err("character budgets must be at least 1".to_string());
        }
        if self.timeout_per_page_secs == 0 {
            return Err("timeout_per_page_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ContentFetchConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            max_chars_per_page: 3000,
            fallback_max_chars: 500,
            timeout_per_page_secs: 10,
            cache_ttl_secs: 1800,
            max_cache_entries: 500,
            reader_url: Some("https://r.jina.ai/".to_string()),
            reader_api_key: None,
        }
    }
}
