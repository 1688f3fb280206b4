use mongodb::bson::{doc, oid::ObjectId};
use serde_json::json;
use wesichain_core::Document;
use wesichain_mongodb::mapper::{document_to_record, record_key, record_to_document};
use wesichain_mongodb::MongoStoreError;

#[test]
fn document_roundtrips_through_record() {
    let doc = Document::new("hello")
        .with_metadata("source", "test")
        .with_metadata("page", 3)
        .with_metadata("nested", json!({"tags": ["a", "b"], "score": 0.5}));

    let record = document_to_record("doc1", &doc).unwrap();
    assert_eq!(record_key(&record), Some("doc1"));
    assert_eq!(record.get_str("page_content").unwrap(), "hello");

    assert_eq!(record_to_document(record).unwrap(), doc);
}

#[test]
fn record_to_document_ignores_object_id() {
    let record = doc! {
        "_id": ObjectId::new(),
        "id": "doc1",
        "page_content": "hello",
        "metadata": {"source": "test"},
    };

    let doc = record_to_document(record).unwrap();
    assert_eq!(doc, Document::new("hello").with_metadata("source", "test"));
}

#[test]
fn record_to_document_rejects_wrong_field_types() {
    let err = record_to_document(doc! {"id": "x", "metadata": "not a map"}).unwrap_err();
    assert!(matches!(err, MongoStoreError::Decode(_)));
}

#[test]
fn record_key_requires_string_id() {
    assert_eq!(record_key(&doc! {"id": 1}), None);
    assert_eq!(record_key(&doc! {}), None);
}
