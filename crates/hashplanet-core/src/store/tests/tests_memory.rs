//! Tests for the in-memory store

#![allow(clippy::expect_used)]

use std::time::Duration;

use crate::store::{FingerprintStore, MemoryStore, StoreError, StoreStats, close_session};

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_versions_keep_insertion_order() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.expect("Failed to begin");

    for label in ["2.0", "10.0", "1.0"] {
        assert!(session.insert_version("jquery", label).await.expect("insert"));
    }
    assert!(!session.insert_version("jquery", "10.0").await.expect("insert"));

    let versions = session.get_versions("jquery").await.expect("get_versions");
    assert_eq!(versions, labels(&["2.0", "10.0", "1.0"]));
    assert!(session.get_versions("unknown").await.expect("get_versions").is_empty());
}

#[tokio::test]
async fn test_files_unique_per_technology() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.expect("Failed to begin");

    assert!(session.insert_file("a", "README.md").await.expect("insert"));
    assert!(!session.insert_file("a", "README.md").await.expect("insert"));
    assert!(session.insert_file("b", "README.md").await.expect("insert"));

    let stats = session.stats().await.expect("stats");
    assert_eq!(stats.files, 2);
}

#[tokio::test]
async fn test_upsert_hash_creates_then_extends() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.expect("Failed to begin");

    let first = session
        .upsert_hash("abc", "jquery", &labels(&["1.0"]))
        .await
        .expect("upsert");
    assert!(first.created);
    assert_eq!(first.added, 1);

    let second = session
        .upsert_hash("abc", "jquery", &labels(&["1.0", "1.1"]))
        .await
        .expect("upsert");
    assert!(!second.created);
    assert_eq!(second.added, 1);

    let record = session
        .find_hash("abc")
        .await
        .expect("find_hash")
        .expect("hash exists");
    assert_eq!(record.versions, labels(&["1.0", "1.1"]));
}

#[tokio::test]
async fn test_upsert_hash_never_overwrites_technology() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.expect("Failed to begin");

    session
        .upsert_hash("abc", "jquery", &labels(&["1.0"]))
        .await
        .expect("upsert");
    let other = session
        .upsert_hash("abc", "zepto", &labels(&["0.9"]))
        .await
        .expect("upsert");

    assert_eq!(other.technology, "jquery");
    let record = session
        .find_hash("abc")
        .await
        .expect("find_hash")
        .expect("hash exists");
    assert_eq!(record.technology, "jquery");
    assert_eq!(record.versions, labels(&["1.0", "0.9"]));
}

#[tokio::test]
async fn test_commit_publishes_writes() {
    let store = MemoryStore::new();

    let mut session = store.begin().await.expect("Failed to begin");
    session.insert_version("t", "1.0").await.expect("insert");
    session.commit().await.expect("commit");

    let mut reader = store.begin().await.expect("Failed to begin");
    assert_eq!(reader.get_versions("t").await.expect("get"), labels(&["1.0"]));
}

#[tokio::test]
async fn test_rollback_discards_writes() {
    let store = MemoryStore::new();

    let mut session = store.begin().await.expect("Failed to begin");
    session.insert_version("t", "1.0").await.expect("insert");
    session.rollback().await.expect("rollback");

    let mut reader = store.begin().await.expect("Failed to begin");
    assert_eq!(reader.stats().await.expect("stats"), StoreStats::default());
}

#[tokio::test]
async fn test_dropped_session_discards_writes() {
    let store = MemoryStore::new();

    {
        let mut session = store.begin().await.expect("Failed to begin");
        session.insert_file("t", "a.js").await.expect("insert");
    }

    let mut reader = store.begin().await.expect("Failed to begin");
    assert!(reader.file_paths().await.expect("paths").is_empty());
}

#[tokio::test]
async fn test_closed_session_rejects_operations() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.expect("Failed to begin");
    session.commit().await.expect("commit");

    assert!(matches!(
        session.insert_version("t", "1.0").await,
        Err(StoreError::Closed)
    ));
    assert!(matches!(session.commit().await, Err(StoreError::Closed)));
}

#[tokio::test]
async fn test_second_session_waits_for_first() {
    let store = MemoryStore::new();
    let session = store.begin().await.expect("Failed to begin");

    let waiting = tokio::time::timeout(Duration::from_millis(50), store.begin()).await;
    assert!(waiting.is_err(), "second session opened while first was live");

    drop(session);
    let reopened = tokio::time::timeout(Duration::from_secs(1), store.begin()).await;
    assert!(reopened.is_ok());
}

#[tokio::test]
async fn test_close_session_commits_on_ok() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.expect("Failed to begin");
    session.insert_version("t", "1.0").await.expect("insert");

    let result: Result<u32, StoreError> = close_session(session, Ok(7)).await;
    assert_eq!(result.expect("close"), 7);

    let mut reader = store.begin().await.expect("Failed to begin");
    assert_eq!(reader.stats().await.expect("stats").versions, 1);
}

#[tokio::test]
async fn test_close_session_rolls_back_on_err() {
    let store = MemoryStore::new();
    let mut session = store.begin().await.expect("Failed to begin");
    session.insert_version("t", "1.0").await.expect("insert");

    let result: Result<(), StoreError> =
        close_session(session, Err(StoreError::Query("boom".to_string()))).await;
    assert!(matches!(result, Err(StoreError::Query(_))));

    let mut reader = store.begin().await.expect("Failed to begin");
    assert_eq!(reader.stats().await.expect("stats").versions, 0);
}
