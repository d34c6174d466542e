// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text generation seam

use async_trait::async_trait;

use super::types::{GenerationError, ModelList, TextRequest, TextStream};

/// Language model backend
///
/// [`super::openai::OpenAiClient`] talks to any OpenAI-compatible gateway.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Stream text increments (not cumulative) for a prompt
    async fn stream_text(&self, request: TextRequest) -> Result<TextStream, GenerationError>;

    /// Ask for a single JSON object answer
    async fn generate_json(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, GenerationError>;

    /// Models available at the backend
    async fn list_models(&self) -> Result<ModelList, GenerationError>;
}
