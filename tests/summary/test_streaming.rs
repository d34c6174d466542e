// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use looq::storage::{MemorySearchStore, SearchStore};
use looq::summary::SummaryEvent;
use std::sync::Arc;

use crate::common::{
    collect_events, result, results, summarizer, terminal_count, RecordingSource,
    ScriptedGenerator, StaticReranker, TEST_MODEL,
};

#[tokio::test]
async fn test_miss_streams_and_persists_summary() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store
        .create_search(
            "rust ownership",
            vec![
                result("https://doc.rust-lang.org/book/", "The Book"),
                result("https://blog.example.com/ownership", "A blog post"),
            ],
            None,
        )
        .await
        .unwrap();

    let source = RecordingSource::serving(&[
        ("https://doc.rust-lang.org/book/", "Ownership is a set of rules."),
        ("https://blog.example.com/ownership", "Borrowing explained."),
    ]);
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["Rust ", "moves ", "values."]));
    let summarizer = summarizer(store.clone(), &source, generator.clone());

    let events = collect_events(&summarizer, &id, Some("m1")).await;

    assert_eq!(
        events,
        vec![
            SummaryEvent::Content {
                content: "Rust ".to_string()
            },
            SummaryEvent::Content {
                content: "Rust moves ".to_string()
            },
            SummaryEvent::Content {
                content: "Rust moves values.".to_string()
            },
            SummaryEvent::Done {
                sources: vec![
                    "https://doc.rust-lang.org/book/".to_string(),
                    "https://blog.example.com/ownership".to_string(),
                ]
            },
        ]
    );

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("rust ownership"));
    assert!(prompt.contains("Source: https://doc.rust-lang.org/book/"));
    assert!(prompt.contains("Ownership is a set of rules."));
    assert!(prompt.contains("The Book"));

    let record = store.get_search(&id).await.unwrap().unwrap();
    let summary = record.summary.unwrap();
    assert_eq!(summary.content, "Rust moves values.");
    assert_eq!(summary.model, "m1");
    assert_eq!(summary.urls.len(), 2);
}

#[tokio::test]
async fn test_content_events_are_cumulative_prefixes() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(2), None).await.unwrap();
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["a", "b", "c", "d"]));
    let summarizer = summarizer(store, &source, generator);

    let events = collect_events(&summarizer, &id, None).await;

    let contents: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            SummaryEvent::Content { content } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(contents, vec!["a", "ab", "abc", "abcd"]);
    for pair in contents.windows(2) {
        assert!(pair[1].starts_with(pair[0]));
    }
    assert_eq!(terminal_count(&events), 1);
    assert!(events.last().unwrap().is_terminal());
}

#[tokio::test]
async fn test_fetches_at_most_five_pages_in_rank_order() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(7), None).await.unwrap();

    let pages: Vec<(String, String)> = (1..=7)
        .map(|i| (format!("https://site{}.example.com/", i), format!("page {}", i)))
        .collect();
    let page_refs: Vec<(&str, &str)> = pages.iter().map(|(u, c)| (u.as_str(), c.as_str())).collect();
    let source = RecordingSource::serving(&page_refs);
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["ok"]));
    let summarizer = summarizer(store, &source, generator);

    let events = collect_events(&summarizer, &id, None).await;

    let mut requested = source.requested();
    requested.sort();
    assert_eq!(requested.len(), 5);
    assert!(!requested.contains(&"https://site6.example.com/".to_string()));
    assert!(!requested.contains(&"https://site7.example.com/".to_string()));

    match events.last().unwrap() {
        SummaryEvent::Done { sources } => {
            let expected: Vec<String> = (1..=5)
                .map(|i| format!("https://site{}.example.com/", i))
                .collect();
            assert_eq!(sources, &expected);
        }
        other => panic!("expected DONE, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_generation_still_emits_content_then_done() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(1), None).await.unwrap();
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::with_chunks(&[]));
    let summarizer = summarizer(store.clone(), &source, generator);

    let events = collect_events(&summarizer, &id, None).await;

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        SummaryEvent::Content {
            content: String::new()
        }
    );
    assert!(matches!(events[1], SummaryEvent::Done { .. }));

    let record = store.get_search(&id).await.unwrap().unwrap();
    assert_eq!(record.summary.unwrap().content, "");
}

#[tokio::test]
async fn test_default_model_used_when_none_requested() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(1), None).await.unwrap();
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["x"]));
    let summarizer = summarizer(store.clone(), &source, generator.clone());

    collect_events(&summarizer, &id, Some("  ")).await;

    let request = generator.prompts.lock().unwrap().last().cloned().unwrap();
    assert_eq!(request.model, TEST_MODEL);
    assert_eq!(request.max_tokens, 500);
    let summary = store.get_search(&id).await.unwrap().unwrap().summary.unwrap();
    assert_eq!(summary.model, TEST_MODEL);
}

#[tokio::test]
async fn test_reranked_pages_become_sources() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(4), None).await.unwrap();
    let source = RecordingSource::serving(&[
        ("https://site1.example.com/", "first"),
        ("https://site2.example.com/", "second"),
        ("https://site3.example.com/", "third"),
        ("https://site4.example.com/", "fourth"),
    ]);
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["s"]));
    let reranker = Arc::new(StaticReranker {
        ranked: vec!["fourth".to_string(), "second".to_string(), "first".to_string()],
    });
    let summarizer = summarizer(store, &source, generator.clone()).with_reranker(reranker);

    let events = collect_events(&summarizer, &id, None).await;

    assert_eq!(
        events.last().unwrap(),
        &SummaryEvent::Done {
            sources: vec![
                "https://site4.example.com/".to_string(),
                "https://site2.example.com/".to_string(),
                "https://site1.example.com/".to_string(),
            ]
        }
    );
    let prompt = generator.last_prompt().unwrap();
    assert!(!prompt.contains("third"));
    assert!(prompt.find("fourth").unwrap() < prompt.find("second").unwrap());
}

#[tokio::test]
async fn test_spawned_run_delivers_events_over_channel() {
    let store = Arc::new(MemorySearchStore::new());
    let id = store.create_search("q", results(1), None).await.unwrap();
    let source = RecordingSource::default();
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["one", " two"]));
    let summarizer = Arc::new(summarizer(store, &source, generator));

    let mut rx = summarizer.spawn(id, None);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(events.len(), 3);
    assert_eq!(terminal_count(&events), 1);
}
