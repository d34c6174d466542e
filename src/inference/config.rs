// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation backend configuration

use std::env;

pub const DEFAULT_MODEL: &str = "groq/llama-3.1-70b-versatile";

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Gateway base URL without the `/v1` suffix
    pub base_url: String,
    pub api_key: Option<String>,
    /// Used when a summary request names no model
    pub default_model: String,
    pub suggestion_model: String,
    /// Token cap for summaries (default: 500)
    pub max_tokens: u32,
    pub connect_timeout_secs: u64,
    /// Timeout for non-streaming calls
    pub request_timeout_secs: u64,
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_model = env::var("DEFAULT_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.default_model);

        Self {
            base_url: env::var("OPENAI_URL").unwrap_or(defaults.base_url),
            api_key: env::var("OPENAI_KEY").ok().filter(|k| !k.is_empty()),
            suggestion_model: env::var("SUGGESTION_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default_model.clone()),
            default_model,
            max_tokens: env::var("SUMMARY_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            connect_timeout_secs: defaults.connect_timeout_secs,
            request_timeout_secs: defaults.request_timeout_secs,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.base_url).map_err(|e| format!("Invalid OPENAI_URL: {}", e))?;
        if self.max_tokens == 0 {
            return Err("SUMMARY_MAX_TOKENS must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            suggestion_model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}
