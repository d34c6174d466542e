// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use looq::storage::SearchStore;
use serde_json::Value;

use crate::common::ScriptedGenerator;
use crate::harness::{get, send, test_app};

#[tokio::test]
async fn test_search_stores_results_and_returns_id() {
    let app = test_app(ScriptedGenerator::default());

    let (response, body) = send(&app.router, get("/api/search?q=rust%20ownership")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    let request_id = json["requestId"].as_str().unwrap().to_string();

    let header = response.headers().get("x-request-id").unwrap();
    assert_eq!(header.to_str().unwrap(), request_id);

    assert_eq!(json["query"], "rust ownership");
    assert_eq!(json["results"].as_array().unwrap().len(), 2);

    let record = app.store.get_search(&request_id).await.unwrap().unwrap();
    assert_eq!(record.query, "rust ownership");
    assert_eq!(record.results.len(), 2);
}

#[tokio::test]
async fn test_search_backfills_suggestions() {
    let app = test_app(ScriptedGenerator::default());

    let (_, body) = send(&app.router, get("/api/search?q=rust")).await;

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json["suggestions"],
        serde_json::json!(["generated one", "generated two"])
    );
}

#[tokio::test]
async fn test_search_missing_query_is_400() {
    let app = test_app(ScriptedGenerator::default());

    let (response, body) = send(&app.router, get("/api/search?language=en")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].is_string());
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_search_blank_query_is_400() {
    let app = test_app(ScriptedGenerator::default());

    let (response, body) = send(&app.router, get("/api/search?q=%20%20")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Query cannot be empty"));
}
