// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Related-query suggestions from a language model
//!
//! Used to fill in when the metasearch upstream returns too few suggestions.
//! Failures are logged and produce an empty list.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::inference::TextGenerator;

/// Upper bound on suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize)]
struct SuggestionsPayload {
    suggestions: Vec<String>,
}

pub struct SuggestionGenerator {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl SuggestionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// Up to five related queries; empty on any failure
    pub async fn suggest(&self, query: &str, context: &str) -> Vec<String> {
        let prompt = suggestion_prompt(query, context);

        let value = match self.generator.generate_json(&self.model, &prompt).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Error generating suggested searches: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_value::<SuggestionsPayload>(value) {
            Ok(payload) => {
                let suggestions: Vec<String> = payload
                    .suggestions
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .take(MAX_SUGGESTIONS)
                    .collect();
                debug!("Generated {} suggestions for: {}", suggestions.len(), query);
                suggestions
            }
            Err(e) => {
                warn!("Suggestion payload did not match schema: {}", e);
                Vec::new()
            }
        }
    }
}

fn suggestion_prompt(query: &str, context: &str) -> String {
    format!(
        "Generate {n} suggested searches based on the user query and the search results. \
         The user query is: \"{query}\".\n\n\
         Search results:\n{context}\n\n\
         Respond only with a JSON object of the form {{\"suggestions\": [\"...\"]}} \
         containing exactly {n} strings.",
        n = MAX_SUGGESTIONS,
        query = query,
        context = context,
    )
}
