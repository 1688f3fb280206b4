use mongodb::bson::{self, Document as BsonDocument};
use wesichain_core::{Document, Record};

use crate::filter::ID_FIELD;
use crate::MongoStoreError;

/// Field the server adds to every inserted record.
pub const OBJECT_ID_FIELD: &str = "_id";

/// Flattens `doc` into `{ "id": key, "page_content": ..., "metadata": {...} }`.
pub fn document_to_record(key: &str, doc: &Document) -> Result<BsonDocument, MongoStoreError> {
    let body = bson::to_document(&Record::from(doc))?;

    let mut record = BsonDocument::new();
    record.insert(ID_FIELD, key);
    for (field, value) in body {
        record.insert(field, value);
    }
    Ok(record)
}

/// Drops the key fields and decodes the remaining record into a document.
pub fn record_to_document(mut record: BsonDocument) -> Result<Document, MongoStoreError> {
    record.remove(ID_FIELD);
    record.remove(OBJECT_ID_FIELD);

    let record: Record = bson::from_document(record)?;
    Ok(Document::from(record))
}

pub fn record_key(record: &BsonDocument) -> Option<&str> {
    record.get_str(ID_FIELD).ok()
}
