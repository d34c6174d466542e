// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page content fetching with fallback sources and timeouts
//!
//! Fetches readable text for the URLs of a search result set. Every failure
//! mode (unsafe URL, timeout, HTTP error, empty page) is absorbed here and
//! surfaces only as a missing entry.

use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::{Host, Url};

use super::config::ContentFetchConfig;
use super::source::{ContentSource, DirectHtmlSource, ReaderProxySource};
use crate::search::cache::TtlCache;

/// Readable text of one page, paired with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedContent {
    pub url: String,
    pub content: String,
}

/// Content fetch error types
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Timeout fetching: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),

    #[error("No content extracted from: {0}")]
    NoContent(String),

    #[error("Unsafe URL blocked: {0}")]
    UnsafeUrl(String),
}

/// Content fetcher with caching and parallel requests
pub struct ContentFetcher {
    sources: Vec<Box<dyn ContentSource>>,
    cache: TtlCache<String>,
    config: ContentFetchConfig,
}

impl ContentFetcher {
    /// Create a fetcher using the reader proxy (when configured) then direct HTML
    pub fn new(config: ContentFetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_per_page_secs))
            .user_agent("Mozilla/5.0 (compatible; LooqBot/1.0)")
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        let mut sources: Vec<Box<dyn ContentSource>> = Vec::new();
        if let Some(reader_url) = &config.reader_url {
            sources.push(Box::new(ReaderProxySource::new(
                client.clone(),
                reader_url.clone(),
                config.reader_api_key.clone(),
                config.max_chars_per_page,
            )));
        }
        sources.push(Box::new(DirectHtmlSource::new(
            client,
            config.fallback_max_chars,
        )));

        Ok(Self::with_sources(config, sources))
    }

    /// Create a fetcher over an explicit source chain
    pub fn with_sources(config: ContentFetchConfig, sources: Vec<Box<dyn ContentSource>>) -> Self {
        let cache = TtlCache::for_urls(config.cache_ttl_secs, config.max_cache_entries);
        Self {
            sources,
            cache,
            config,
        }
    }

    /// Fetch readable text for one URL
    ///
    /// Returns `None` on any failure. Each source gets its own timeout, so a
    /// hanging primary still leaves the fallback a full attempt.
    pub async fn fetch(&self, url: &str) -> Option<FetchedContent> {
        if !Self::is_safe_url(url) {
            warn!("{}", FetchError::UnsafeUrl(url.to_string()));
            return None;
        }

        if let Some(cached) = self.cache.get(url) {
            debug!("Content cache hit for: {}", url);
            return Some(FetchedContent {
                url: url.to_string(),
                content: cached,
            });
        }

        match self.fetch_from_sources(url).await {
            Ok(content) => {
                self.cache.insert(url, content.clone());
                info!("Fetched {} chars from: {}", content.len(), url);
                Some(FetchedContent {
                    url: url.to_string(),
                    content,
                })
            }
            Err(e) => {
                warn!("Content fetch failed: {}", e);
                None
            }
        }
    }

    /// Fetch the first `max_pages` URLs concurrently
    ///
    /// Successes come back in input order; failures are dropped.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchedContent> {
        let futures: Vec<_> = urls
            .iter()
            .take(self.config.max_pages)
            .map(|url| self.fetch(url))
            .collect();

        let contents: Vec<FetchedContent> = join_all(futures).await.into_iter().flatten().collect();

        info!(
            "Collected {} page contents, {} chars total",
            contents.len(),
            contents.iter().map(|c| c.content.len()).sum::<usize>()
        );
        contents
    }

    async fn fetch_from_sources(&self, url: &str) -> Result<String, FetchError> {
        let limit = Duration::from_secs(self.config.timeout_per_page_secs);
        let mut last_error = FetchError::NoContent(url.to_string());

        for source in &self.sources {
            let attempt = timeout(limit, source.fetch(url))
                .await
                .unwrap_or_else(|_| Err(FetchError::Timeout(url.to_string())));

            match attempt {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => debug!("{} returned no text for {}", source.name(), url),
                Err(e) => {
                    debug!("{} failed for {}: {}", source.name(), url, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Check if URL is safe to fetch (http(s) only, no loopback or private hosts)
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if !["http", "https"].contains(&parsed.scheme()) {
            return false;
        }

        match parsed.host() {
            Some(Host::Domain(domain)) => {
                let domain = domain.to_lowercase();
                domain != "localhost" && !domain.ends_with(".localhost")
            }
            Some(Host::Ipv4(ip)) => is_public_ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => is_public_ip(IpAddr::V6(ip)),
            None => false,
        }
    }
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            // fc00::/7 unique local, fe80::/10 link local
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}
