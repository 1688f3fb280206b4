use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::json;
use wesichain_core::mapping_store::{keys_until_error, normalize_prefix};
use wesichain_core::{BatchReport, Document, KeyStream, MappingStore, StoreError};

#[derive(Clone, Default)]
struct RecordingStore {
    entries: Arc<Mutex<BTreeMap<String, Document>>>,
}

#[async_trait]
impl MappingStore for RecordingStore {
    async fn mset(&self, pairs: Vec<(String, Document)>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut entries = self.entries.lock().unwrap();
        for (key, doc) in pairs {
            entries.insert(key, doc);
            report.record_success();
        }
        report
    }

    async fn mget(&self, keys: &[String]) -> Vec<Document> {
        let entries = self.entries.lock().unwrap();
        keys.iter().filter_map(|key| entries.get(key).cloned()).collect()
    }

    async fn mdelete(&self, keys: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
            report.record_success();
        }
        report
    }

    fn yield_keys<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a> {
        let prefix = normalize_prefix(prefix).unwrap_or_default().to_string();
        let keys: Vec<String> = self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        stream::iter(keys).boxed()
    }
}

#[test]
fn mapping_store_trait_object_safe() {
    let _: Option<Arc<dyn MappingStore>> = None;
}

#[tokio::test]
async fn mset_values_skips_non_documents() {
    let store = RecordingStore::default();

    let report = store
        .mset_values(vec![
            ("good".to_string(), json!({"content": "hello", "metadata": {"source": "test"}})),
            ("bad".to_string(), json!(42)),
        ])
        .await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skipped_keys().collect::<Vec<_>>(), vec!["bad"]);
    assert!(matches!(
        report.skipped[0].error,
        StoreError::NotADocument(ref kind) if kind.starts_with("number")
    ));

    let docs = store
        .mget(&["good".to_string(), "bad".to_string()])
        .await;
    assert_eq!(docs, vec![Document::new("hello").with_metadata("source", "test")]);
}

#[tokio::test]
async fn mset_values_accepts_null_metadata() {
    let store = RecordingStore::default();

    let report = store
        .mset_values(vec![("k".to_string(), json!({"content": "x", "metadata": null}))])
        .await;

    assert!(report.is_complete());
    assert_eq!(store.mget(&["k".to_string()]).await, vec![Document::new("x")]);
}

#[tokio::test]
async fn mset_values_with_only_invalid_values_writes_nothing() {
    let store = RecordingStore::default();

    let report = store
        .mset_values(vec![("bad".to_string(), json!("just a string"))])
        .await;

    assert_eq!(report.succeeded, 0);
    assert!(!report.is_complete());
    assert!(store.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn dyn_store_streams_keys_by_prefix() {
    let store: Arc<dyn MappingStore> = Arc::new(RecordingStore::default());
    store
        .mset(vec![
            ("a/1".to_string(), Document::new("one")),
            ("a/2".to_string(), Document::new("two")),
            ("b/1".to_string(), Document::new("three")),
        ])
        .await;

    let keys: Vec<String> = store.yield_keys(Some("a/")).collect().await;
    assert_eq!(keys, vec!["a/1".to_string(), "a/2".to_string()]);

    let all: Vec<String> = store.yield_keys(Some("")).collect().await;
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn keys_until_error_stops_at_first_failure() {
    let listing = stream::iter(vec![Ok("a".to_string()), Err("boom"), Ok("c".to_string())]).boxed();

    let keys: Vec<String> = keys_until_error(listing).collect().await;
    assert_eq!(keys, vec!["a".to_string()]);
}

#[test]
fn batch_report_merge_accumulates() {
    let mut left = BatchReport::default();
    left.record_success();

    let mut right = BatchReport::default();
    right.record_success();
    right.skip("k", StoreError::NotADocument("null".to_string()));

    left.merge(right);
    assert_eq!(left.succeeded, 2);
    assert_eq!(left.skipped_keys().collect::<Vec<_>>(), vec!["k"]);
}
