// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API endpoint handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info, warn};

use super::response::SearchApiResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::search::SearchParams;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// GET /api/search - Proxy a metasearch query and store the result set
///
/// # Query
/// - `q`: Search query string (required, max 500 chars)
/// - `language`, `time_range`, `safesearch`, `categories`: forwarded upstream
///
/// # Response
/// The upstream result set plus `requestId`, which is also sent as the
/// `X-Request-Id` header.
///
/// # Errors
/// - 400 Bad Request: Missing or invalid query
/// - 429 Too Many Requests: Rate limited
/// - 500 Internal Server Error: Upstream or storage failure
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| {
        warn!("Rejected search query string: {}", e);
        ApiError::InvalidRequest(e.body_text())
    })?;
    debug!("Search request: {:?}", params.q);

    let outcome = state.search.search(&params).await.map_err(|e| {
        warn!("Search failed: {}", e);
        ApiError::from(e)
    })?;

    info!(
        "Search complete: {} results for '{}' (request {})",
        outcome.response.results.len(),
        params.q,
        outcome.request_id
    );

    let header_value = HeaderValue::from_str(&outcome.request_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    let body = SearchApiResponse::from(outcome);

    Ok((
        [(HeaderName::from_static(REQUEST_ID_HEADER), header_value)],
        Json(body),
    )
        .into_response())
}
