// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Events emitted while a summary is produced

use serde_json::{json, Value};

pub const CONTENT_EVENT: &str = "ai-response";
pub const DONE_EVENT: &str = "DONE";
pub const ERROR_EVENT: &str = "ERROR";

/// One server-sent event of a summary stream
///
/// A stream carries zero or more `Content` events and ends with exactly one
/// `Done` or `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryEvent {
    /// Full text so far
    Content { content: String },
    Done { sources: Vec<String> },
    Error { error: String },
}

impl SummaryEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Content { .. } => CONTENT_EVENT,
            Self::Done { .. } => DONE_EVENT,
            Self::Error { .. } => ERROR_EVENT,
        }
    }

    /// JSON payload for the `data:` field
    pub fn data(&self) -> Value {
        match self {
            Self::Content { content } => json!({ "content": content }),
            Self::Done { sources } => json!({ "message": "DONE", "sources": sources }),
            Self::Error { error } => json!({ "message": "ERROR", "error": error }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Content { .. })
    }
}
