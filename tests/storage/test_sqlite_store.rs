// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use looq::search::{InfoBox, InfoBoxUrl};
use looq::storage::{SearchStore, SqliteSearchStore, StoreConfig, StoreError, Summary};
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{collect_events, results, summarizer, RecordingSource, ScriptedGenerator};

fn summary(content: &str, model: &str) -> Summary {
    Summary {
        content: content.to_string(),
        urls: vec!["https://site1.example.com/".to_string()],
        model: model.to_string(),
    }
}

#[tokio::test]
async fn test_record_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("looq.db");

    let id = {
        let store = SqliteSearchStore::open(&path).unwrap();
        let info_boxes = vec![InfoBox {
            infobox: "Rust".to_string(),
            content: None,
            urls: vec![InfoBoxUrl {
                title: "Wikipedia".to_string(),
                url: "https://en.wikipedia.org/wiki/Rust".to_string(),
            }],
        }];
        let id = store
            .create_search("rust", results(3), Some(info_boxes))
            .await
            .unwrap();
        store.attach_summary(&id, summary("text", "m1")).await.unwrap();
        id
    };

    let reopened = SqliteSearchStore::open(&path).unwrap();
    let record = reopened.get_search(&id).await.unwrap().unwrap();
    assert_eq!(record.query, "rust");
    assert_eq!(record.results.len(), 3);
    assert_eq!(record.info_box_titles(), vec!["Rust".to_string()]);
    assert_eq!(record.summary, Some(summary("text", "m1")));

    let cached = reopened
        .find_summary_by_query_and_model("rust", "m1")
        .await
        .unwrap();
    assert_eq!(cached, Some(summary("text", "m1")));
}

#[tokio::test]
async fn test_last_write_wins_per_query_and_model() {
    let store = SqliteSearchStore::in_memory().unwrap();
    let a = store.create_search("q", results(1), None).await.unwrap();
    let b = store.create_search("q", results(1), None).await.unwrap();

    store.attach_summary(&a, summary("first", "m1")).await.unwrap();
    store.attach_summary(&b, summary("second", "m1")).await.unwrap();
    store.attach_summary(&b, summary("other", "m2")).await.unwrap();

    let m1 = store.find_summary_by_query_and_model("q", "m1").await.unwrap();
    assert_eq!(m1.unwrap().content, "second");
    let m2 = store.find_summary_by_query_and_model("q", "m2").await.unwrap();
    assert_eq!(m2.unwrap().content, "other");
    assert!(store
        .find_summary_by_query_and_model("other query", "m1")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_attach_to_unknown_id_is_not_found() {
    let store = SqliteSearchStore::in_memory().unwrap();
    let err = store
        .attach_summary("missing", summary("x", "m1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(store.get_search("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_summarizer_over_sqlite_store() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        database_path: dir.path().join("looq.db"),
    };
    let store = Arc::new(config.open().unwrap());
    let id = store.create_search("q", results(2), None).await.unwrap();
    let source = RecordingSource::serving(&[("https://site2.example.com/", "body")]);
    let generator = Arc::new(ScriptedGenerator::with_chunks(&["persisted"]));
    let summarizer = summarizer(store.clone(), &source, generator.clone());

    collect_events(&summarizer, &id, Some("m1")).await;
    let second = collect_events(&summarizer, &id, Some("m1")).await;

    assert_eq!(generator.calls(), 1);
    assert_eq!(second.len(), 2);
    let record = store.get_search(&id).await.unwrap().unwrap();
    assert_eq!(
        record.summary.unwrap().urls,
        vec!["https://site2.example.com/".to_string()]
    );
}
