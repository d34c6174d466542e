// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use looq::storage::{MemorySearchStore, SearchStore};
use looq::summary::SummaryEvent;
use std::sync::Arc;

use crate::common::{
    collect_events, results, summarizer, terminal_count, RecordingSource, ScriptedGenerator,
};

#[tokio::test]
async fn test_unknown_request_id_fails_without_generation() {
    let store = Arc::new(MemorySearchStore::new());
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["never"]));
    let summarizer = summarizer(store, &source, generator.clone());

    let events = collect_events(&summarizer, "doesnotexist", None).await;

    assert_eq!(
        events,
        vec![SummaryEvent::Error {
            error: "Search not found: doesnotexist".to_string()
        }]
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_all_fetches_fail_still_generates_from_snippets() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(5), None).await.unwrap();
    // Serves nothing, so every page fails
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["from snippets"]));
    let summarizer = summarizer(store, &source, generator.clone());

    let events = collect_events(&summarizer, &id, None).await;

    assert_eq!(source.requested().len(), 5);
    assert_eq!(generator.calls(), 1);
    assert_eq!(
        events.last().unwrap(),
        &SummaryEvent::Done { sources: vec![] }
    );
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("snippet 1"));
    assert!(!prompt.contains("Source: "));
}

#[tokio::test]
async fn test_partial_fetch_failure_keeps_successes() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(3), None).await.unwrap();
    let source = RecordingSource::serving(&[
        ("https://site1.example.com/", "one"),
        ("https://site3.example.com/", "three"),
    ]);
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["s"]));
    let summarizer = summarizer(store, &source, generator);

    let events = collect_events(&summarizer, &id, None).await;

    assert_eq!(
        events.last().unwrap(),
        &SummaryEvent::Done {
            sources: vec![
                "https://site1.example.com/".to_string(),
                "https://site3.example.com/".to_string(),
            ]
        }
    );
}

#[tokio::test]
async fn test_mid_stream_failure_emits_partial_then_error() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(1), None).await.unwrap();
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::failing_after(
        &["partial ", "answer"],
        "upstream returned 500",
    ));
    let summarizer = summarizer(store.clone(), &source, generator);

    let events = collect_events(&summarizer, &id, None).await;

    assert_eq!(events.len(), 3);
    assert_eq!(
        events[1],
        SummaryEvent::Content {
            content: "partial answer".to_string()
        }
    );
    match &events[2] {
        SummaryEvent::Error { error } => assert!(error.contains("upstream returned 500")),
        other => panic!("expected ERROR, got {:?}", other),
    }
    assert_eq!(terminal_count(&events), 1);

    let record = store.get_search(&id).await.unwrap().unwrap();
    assert!(record.summary.is_none());
}

#[tokio::test]
async fn test_generation_rejected_at_start_emits_only_error() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(1), None).await.unwrap();
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::failing_on_start("overloaded"));
    let summarizer = summarizer(store, &source, generator);

    let events = collect_events(&summarizer, &id, None).await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        SummaryEvent::Error { error } => assert!(error.contains("503")),
        other => panic!("expected ERROR, got {:?}", other),
    }
}

#[tokio::test]
async fn test_disconnect_stops_without_persisting() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(1), None).await.unwrap();
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["a", "b", "c"]));
    let summarizer = summarizer(store.clone(), &source, generator);

    let (tx, rx) = tokio::sync::mpsc::channel(1);
    drop(rx);
    summarizer.run(&id, None, tx).await;

    let record = store.get_search(&id).await.unwrap().unwrap();
    assert!(record.summary.is_none());
    assert!(store
        .find_summary_by_query_and_model("q", crate::common::TEST_MODEL)
        .await
        .unwrap()
        .is_none());
}
