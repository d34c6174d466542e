// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::summary::SummaryEvent;

/// Named SSE event carrying the JSON payload
pub fn to_sse_event(event: &SummaryEvent) -> Event {
    Event::default()
        .event(event.event_name())
        .data(event.data().to_string())
}

/// Adapt a summarizer receiver into an SSE body stream
///
/// Dropping the returned stream (client disconnect) drops the receiver, which
/// the summarizer observes as a failed send.
pub fn summary_sse_stream(
    receiver: mpsc::Receiver<SummaryEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    ReceiverStream::new(receiver).map(|event| Ok(to_sse_event(&event)))
}
