// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::inference::ModelList;
use crate::search::AutocompleteResponse;
use crate::version::VERSION;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteRequest {
    pub q: String,
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

/// GET /api/models - Models offered by the generation backend
pub async fn models_handler(State(state): State<AppState>) -> Result<Json<ModelList>, ApiError> {
    let models = state.generator.list_models().await.map_err(|e| {
        warn!("Model listing failed: {}", e);
        ApiError::from(e)
    })?;
    debug!("Listing {} models", models.data.len());
    Ok(Json(models))
}

/// GET /api/autocompleter?q=.. - `[q, [completions]]`
pub async fn autocomplete_handler(
    State(state): State<AppState>,
    query: Result<Query<AutocompleteRequest>, QueryRejection>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let Query(request) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let completions = state.search.autocomplete(&request.q).await.map_err(|e| {
        warn!("Autocomplete failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(completions))
}
