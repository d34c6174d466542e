// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the metasearch upstream

use std::env;

/// Configuration for talking to the metasearch (SearXNG) instance
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the SearXNG instance, without trailing slash
    pub searxng_url: String,
    /// Cloudflare Access service-token credentials
    pub access: AccessCredentials,
    /// Rate limit (requests per minute)
    pub rate_limit_per_minute: u32,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// TTL of cached autocomplete responses in seconds
    pub autocomplete_cache_ttl_secs: u64,
    /// Maximum cached autocomplete entries
    pub autocomplete_cache_entries: usize,
    /// Below this many upstream suggestions, generated ones are used instead
    pub min_suggestions: usize,
}

/// Cloudflare Access service-token credentials
#[derive(Debug, Clone, Default)]
pub struct AccessCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl AccessCredentials {
    /// Both halves present and non-empty
    pub fn is_configured(&self) -> bool {
        matches!(
            (&self.client_id, &self.client_secret),
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty()
        )
    }
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            searxng_url: env::var("SEARXNG_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.searxng_url),
            access: AccessCredentials {
                client_id: env::var("CF_ACCESS_CLIENT_ID").ok(),
                client_secret: env::var("CF_ACCESS_CLIENT_SECRET").ok(),
            },
            rate_limit_per_minute: env::var("SEARCH_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_per_minute),
            request_timeout_ms: env::var("SEARCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            autocomplete_cache_ttl_secs: env::var("AUTOCOMPLETE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.autocomplete_cache_ttl_secs),
            autocomplete_cache_entries: defaults.autocomplete_cache_entries,
            min_suggestions: defaults.min_suggestions,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.searxng_url.is_empty() {
            return Err("SEARXNG_URL must be set".to_string());
        }
        if url::Url::parse(&self.searxng_url).is_err() {
            return Err(format!("SEARXNG_URL is not a valid URL: {}", self.searxng_url));
        }
        if self.rate_limit_per_minute == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("Search timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            searxng_url: "http://localhost:8888".to_string(),
            access: AccessCredentials::default(),
            rate_limit_per_minute: 120,
            request_timeout_ms: 10000,
            autocomplete_cache_ttl_secs: 3600,
            autocomplete_cache_entries: 1000,
            min_suggestions: 2,
        }
    }
}
