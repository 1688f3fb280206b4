use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::StreamExt;
use wesichain_core::{Document, MappingStore};
use wesichain_mongodb::MongoDocumentStore;

fn mongodb_contract_enabled() -> bool {
    std::env::var("RUN_MONGODB_CONTRACT").ok().as_deref() == Some("1")
}

fn unique_collection() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should move forward")
        .as_nanos();
    format!("contract_{now}")
}

async fn build_store() -> MongoDocumentStore {
    let uri =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string());

    MongoDocumentStore::builder()
        .connection_string(uri)
        .database("wesichain_contract")
        .collection(unique_collection())
        .build()
        .await
        .expect("store should build")
}

#[tokio::test]
async fn contract_set_get_list_delete_roundtrip() {
    // Contract tests are opt-in because they require a live MongoDB instance.
    if !mongodb_contract_enabled() {
        return;
    }

    let store = build_store().await;
    let doc = Document::new("hello").with_metadata("source", "test");

    let report = store
        .mset(vec![
            ("doc1".to_string(), doc.clone()),
            ("a/1".to_string(), Document::new("one")),
            ("a/2".to_string(), Document::new("two")),
            ("b/1".to_string(), Document::new("three")),
        ])
        .await;
    assert!(report.is_complete(), "inserts should succeed: {report:?}");

    let docs = store
        .mget(&["doc1".to_string(), "missing".to_string()])
        .await;
    assert_eq!(docs, vec![doc.clone()]);

    let report = store
        .mset(vec![("doc1".to_string(), Document::new("replacement"))])
        .await;
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.skipped_keys().collect::<Vec<_>>(), vec!["doc1"]);
    assert_eq!(store.mget(&["doc1".to_string()]).await, vec![doc]);

    let keys: HashSet<String> = store.yield_keys(Some("a/")).collect().await;
    assert_eq!(keys, HashSet::from(["a/1".to_string(), "a/2".to_string()]));

    let report = store
        .mdelete(&["a/1".to_string(), "never-written".to_string()])
        .await;
    assert!(report.is_complete());
    assert!(store.mget(&["a/1".to_string()]).await.is_empty());

    store.collection().drop().await.expect("collection should drop");
}
