// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Content sources tried in order by the fetcher
//!
//! The reader proxy returns clean text for most pages. When it fails or
//! returns nothing, the page is downloaded directly and converted locally.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

use super::extractor::{extract_markdown, truncate_with_marker};
use super::fetcher::FetchError;

/// One way of turning a URL into readable text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch readable text for `url`, already cut to this source's budget
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Remote reader proxy that renders pages to markdown (r.jina.ai style)
pub struct ReaderProxySource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_chars: usize,
}

impl ReaderProxySource {
    pub fn new(client: Client, base_url: String, api_key: Option<String>, max_chars: usize) -> Self {
        Self {
            client,
            base_url,
            api_key,
            max_chars,
        }
    }
}

#[async_trait]
impl ContentSource for ReaderProxySource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut request = self.client.get(format!("{}{}", self.base_url, url));
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| map_reqwest_error(e, url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::HttpError(e.to_string()))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(FetchError::NoContent(url.to_string()));
        }

        debug!("Reader proxy returned {} chars for {}", text.len(), url);
        Ok(truncate_with_marker(text, self.max_chars))
    }

    fn name(&self) -> &'static str {
        "reader-proxy"
    }
}

/// Direct download with local HTML to markdown conversion
pub struct DirectHtmlSource {
    client: Client,
    max_chars: usize,
}

impl DirectHtmlSource {
    pub fn new(client: Client, max_chars: usize) -> Self {
        Self { client, max_chars }
    }
}

#[async_trait]
impl ContentSource for DirectHtmlSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::HttpError(e.to_string()))?;

        let text = extract_markdown(&html, self.max_chars);
        if text.is_empty() {
            return Err(FetchError::NoContent(url.to_string()));
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "direct-html"
    }
}

fn map_reqwest_error(e: reqwest::Error, url: &str) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::HttpError(e.to_string())
    }
}
