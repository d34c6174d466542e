// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use tracing::info;

use super::request::SummaryApiRequest;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::streaming::summary_sse_stream;

/// POST /api/summary - Stream a summary of a stored search as SSE
///
/// Events: `ai-response` with the cumulative text, then exactly one of
/// `DONE` (with sources) or `ERROR`. A malformed body is rejected before
/// the stream opens.
pub async fn summary_handler(
    State(state): State<AppState>,
    body: Result<Json<SummaryApiRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    request.validate()?;

    info!(
        "Summary requested for {} (model: {})",
        request.request_id,
        request.model.as_deref().unwrap_or("default")
    );

    let receiver = state.summarizer.spawn(request.request_id, request.model);
    Ok(Sse::new(summary_sse_stream(receiver)).keep_alive(KeepAlive::default()))
}
