// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenAI-compatible generation client
//!
//! Works against OpenAI itself or any gateway exposing `/v1/chat/completions`
//! and `/v1/models` (provider-prefixed model ids such as
//! `groq/llama-3.1-70b-versatile` are passed through untouched).

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use super::config::GenerationConfig;
use super::generator::TextGenerator;
use super::sse::{SseEvent, SseLineParser};
use super::types::{GenerationError, ModelList, TextRequest, TextStream};

pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    request_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        // No overall timeout: it would cut long streams short
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, GenerationError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn stream_text(&self, request: TextRequest) -> Result<TextStream, GenerationError> {
        debug!("Streaming completion with model: {}", request.model);

        let body = json!({
            "model": request.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_tokens,
            "stream": true,
        });

        let response = self
            .send(
                self.client
                    .post(format!("{}/v1/chat/completions", self.base_url))
                    .json(&body),
            )
            .await?;

        Ok(Box::pin(text_stream(response.bytes_stream())))
    }

    async fn generate_json(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, GenerationError> {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"},
            "stream": false,
        });

        let response = self
            .send(
                self.client
                    .post(format!("{}/v1/chat/completions", self.base_url))
                    .timeout(self.request_timeout)
                    .json(&body),
            )
            .await?;

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Validation(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenerationError::Validation("completion has no content".to_string()))?;

        serde_json::from_str(strip_code_fence(&content))
            .map_err(|e| GenerationError::Parse(e.to_string()))
    }

    async fn list_models(&self) -> Result<ModelList, GenerationError> {
        let response = self
            .send(
                self.client
                    .get(format!("{}/v1/models", self.base_url))
                    .timeout(self.request_timeout),
            )
            .await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| GenerationError::Validation(e.to_string()))
    }
}

/// Some gateways wrap JSON mode answers in a markdown fence
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

struct StreamState {
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    parser: SseLineParser,
    pending: VecDeque<Result<String, GenerationError>>,
    finished: bool,
}

impl StreamState {
    /// Queue the items carried by one SSE event; returns true when the stream is over
    fn absorb(&mut self, event: &SseEvent) -> bool {
        if event.is_done() {
            return true;
        }

        match serde_json::from_str::<StreamChunk>(&event.data) {
            Ok(chunk) => {
                if let Some(error) = chunk.error {
                    self.pending
                        .push_back(Err(GenerationError::Stream(error.to_string())));
                    return true;
                }
                for choice in chunk.choices {
                    if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
                        self.pending.push_back(Ok(content));
                    }
                }
                false
            }
            Err(e) => {
                warn!("Unparseable completion chunk: {}", e);
                self.pending.push_back(Err(GenerationError::Parse(e.to_string())));
                true
            }
        }
    }
}

/// Turn a chat-completions SSE byte stream into text increments
///
/// The stream ends after `[DONE]`, after the first error item, or when the
/// body ends.
pub(crate) fn text_stream(
    byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
) -> impl Stream<Item = Result<String, GenerationError>> + Send {
    futures::stream::unfold(
        StreamState {
            byte_stream: Box::pin(byte_stream),
            parser: SseLineParser::new(),
            pending: VecDeque::new(),
            finished: false,
        },
        |mut state| async move {
            loop {
                if let Some(item) = state.pending.pop_front() {
                    return Some((item, state));
                }
                if state.finished {
                    return None;
                }

                match state.byte_stream.next().await {
                    Some(Ok(chunk)) => {
                        for event in state.parser.push(&chunk) {
                            if state.absorb(&event) {
                                state.finished = true;
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        state.finished = true;
                        return Some((
                            Err(GenerationError::Stream(format!("Stream read error: {}", e))),
                            state,
                        ));
                    }
                    None => {
                        state.finished = true;
                        if let Some(event) = state.parser.flush() {
                            state.absorb(&event);
                        }
                    }
                }
            }
        },
    )
}
