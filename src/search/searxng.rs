// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SearXNG metasearch provider
//!
//! Talks to a self-hosted SearXNG instance, optionally sitting behind
//! Cloudflare Access. Responses are deserialized into the strict types in
//! [`super::types`]; anything that does not fit is a validation error.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::cache::TtlCache;
use super::config::{AccessCredentials, SearchConfig};
use super::provider::MetasearchProvider;
use super::rate_limiter::SearchRateLimiter;
use super::types::{AutocompleteResponse, MetasearchResponse, SearchError, SearchParams};

const ACCESS_CLIENT_ID_HEADER: &str = "cf-access-client-id";
const ACCESS_CLIENT_SECRET_HEADER: &str = "cf-access-client-secret";

/// SearXNG JSON API client
pub struct SearxngClient {
    base_url: String,
    client: Client,
    rate_limiter: SearchRateLimiter,
    autocomplete_cache: TtlCache<AutocompleteResponse>,
    timeout_ms: u64,
}

impl SearxngClient {
    /// Create a new client from configuration
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .default_headers(access_headers(&config.access)?)
            .build()
            .map_err(|e| SearchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        let rate_limiter = SearchRateLimiter::new(config.rate_limit_per_minute);
        debug!(
            "Metasearch client for {} at {} requests/min",
            config.searxng_url,
            rate_limiter.requests_per_minute()
        );

        Ok(Self {
            base_url: config.searxng_url.trim_end_matches('/').to_string(),
            client,
            rate_limiter,
            autocomplete_cache: TtlCache::for_queries(
                config.autocomplete_cache_ttl_secs,
                config.autocomplete_cache_entries,
            ),
            timeout_ms: config.request_timeout_ms,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SearchError> {
        self.rate_limiter.check()?;

        let url = format!("{}{}", self.base_url, path);
        debug!("Metasearch request: {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Http(format!("timeout after {}ms", self.timeout_ms))
                } else {
                    SearchError::Http(e.to_string())
                }
            })?;

        parse_response(response).await
    }
}

/// Build the Cloudflare Access headers sent with every request
///
/// Headers are only attached when both the client id and secret are present.
pub fn access_headers(access: &AccessCredentials) -> Result<HeaderMap, SearchError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let (true, Some(id), Some(secret)) = (
        access.is_configured(),
        access.client_id.as_deref(),
        access.client_secret.as_deref(),
    ) {
        let id = HeaderValue::from_str(id)
            .map_err(|_| SearchError::Http("CF_ACCESS_CLIENT_ID is not a valid header".to_string()))?;
        let mut secret = HeaderValue::from_str(secret).map_err(|_| {
            SearchError::Http("CF_ACCESS_CLIENT_SECRET is not a valid header".to_string())
        })?;
        secret.set_sensitive(true);
        headers.insert(ACCESS_CLIENT_ID_HEADER, id);
        headers.insert(ACCESS_CLIENT_SECRET_HEADER, secret);
    }

    Ok(headers)
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, SearchError> {
    let status = response.status();

    if status.as_u16() == 429 {
        return Err(SearchError::RateLimited {
            retry_after_secs: 60,
        });
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(SearchError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| SearchError::Http(e.to_string()))?;

    serde_json::from_slice(&body).map_err(|e| SearchError::Validation(e.to_string()))
}

#[async_trait]
impl MetasearchProvider for SearxngClient {
    async fn search(&self, params: &SearchParams) -> Result<MetasearchResponse, SearchError> {
        params.validate()?;
        self.get_json("/search", &params.to_query_pairs()).await
    }

    async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse, SearchError> {
        // The cache key folds case, so echo the query as asked this time
        if let Some((_, completions)) = self.autocomplete_cache.get(query) {
            debug!("Autocomplete cache hit for: {}", query);
            return Ok((query.to_string(), completions));
        }

        let response: AutocompleteResponse = self
            .get_json("/autocompleter", &[("q", query.to_string())])
            .await?;
        self.autocomplete_cache.insert(query, response.clone());
        Ok(response)
    }

    fn name(&self) -> &'static str {
        "searxng"
    }
}
