// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use looq::storage::SearchStore;
use serde_json::Value;

use crate::common::{results, ScriptedGenerator};
use crate::harness::{post_json, send, test_app};

/// (event name, data) pairs of an SSE body
fn parse_sse(body: &str) -> Vec<(String, Value)> {
    body.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| {
            let mut name = None;
            let mut data = None;
            for line in block.lines() {
                if let Some(v) = line.strip_prefix("event:") {
                    name = Some(v.trim().to_string());
                } else if let Some(v) = line.strip_prefix("data:") {
                    data = Some(serde_json::from_str(v.trim()).unwrap());
                }
            }
            Some((name?, data?))
        })
        .collect()
}

#[tokio::test]
async fn test_summary_streams_named_events() {
    let app = test_app(ScriptedGenerator::with_chunks(&["Hello", " world"]));
    let id = app.store.create_search("q", results(1), None).await.unwrap();

    let request = post_json("/api/summary", &format!(r#"{{"requestId": "{}"}}"#, id));
    let (response, body) = send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let events = parse_sse(&body);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].0, "ai-response");
    assert_eq!(events[0].1["content"], "Hello");
    assert_eq!(events[1].1["content"], "Hello world");
    assert_eq!(events[2].0, "DONE");
    assert_eq!(events[2].1["message"], "DONE");
    assert_eq!(
        events[2].1["sources"],
        serde_json::json!(["https://site1.example.com/"])
    );
}

#[tokio::test]
async fn test_summary_unknown_id_streams_error_event() {
    let app = test_app(ScriptedGenerator::with_chunks(&["never"]));

    let request = post_json("/api/summary", r#"{"requestId": "doesnotexist", "model": "m1"}"#);
    let (response, body) = send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let events = parse_sse(&body);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "ERROR");
    assert_eq!(events[0].1["message"], "ERROR");
    assert_eq!(events[0].1["error"], "Search not found: doesnotexist");
    assert_eq!(app.generator.calls(), 0);
}

#[tokio::test]
async fn test_summary_malformed_body_is_400() {
    let app = test_app(ScriptedGenerator::default());

    let (response, body) = send(&app.router, post_json("/api/summary", r#"{"model": 5}"#)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_summary_blank_request_id_is_400() {
    let app = test_app(ScriptedGenerator::default());

    let (response, _) = send(&app.router, post_json("/api/summary", r#"{"requestId": ""}"#)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
