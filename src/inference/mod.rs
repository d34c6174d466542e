// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Text generation against OpenAI-compatible backends
pub mod config;
pub mod generator;
pub mod openai;
pub mod sse;
pub mod types;

// Re-export main types for convenience
pub use config::{GenerationConfig, DEFAULT_MODEL};
pub use generator::TextGenerator;
pub use openai::OpenAiClient;
pub use sse::{SseEvent, SseLineParser};
pub use types::{GenerationError, ModelInfo, ModelList, TextRequest, TextStream};
