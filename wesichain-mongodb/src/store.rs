use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use mongodb::bson::Document as BsonDocument;
use mongodb::Collection;
use tracing::Instrument;
use wesichain_core::mapping_store::{keys_until_error, normalize_prefix};
use wesichain_core::{BatchReport, Document, KeyStream, MappingStore, StoreError};

use crate::filter::ID_FIELD;
use crate::mapper::{document_to_record, record_key, record_to_document};
use crate::{DocumentCollection, KeyFilter, MongoStoreBuilder, MongoStoreError};

const KEY_PROJECTION: &[&str] = &[ID_FIELD];

/// Mapping store keeping one record per key in a MongoDB collection.
///
/// Writes go out as a single unordered bulk insert, reads and deletes as a
/// single filtered query. `mget` returns documents in the order the server
/// yields them, not in input key order.
#[derive(Clone, Debug)]
pub struct MongoDocumentStore<C = Collection<BsonDocument>> {
    collection: C,
}

impl MongoDocumentStore<Collection<BsonDocument>> {
    pub fn builder() -> MongoStoreBuilder {
        MongoStoreBuilder::new()
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

impl<C> MongoDocumentStore<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }
}

fn batch_failed(message: &str) -> StoreError {
    MongoStoreError::BatchFailed {
        message: message.to_string(),
    }
    .into()
}

#[async_trait::async_trait]
impl<C: DocumentCollection> MappingStore for MongoDocumentStore<C> {
    async fn mset(&self, pairs: Vec<(String, Document)>) -> BatchReport {
        let span = tracing::info_span!("mongodb_mset", batch_size = pairs.len());

        async move {
            let mut report = BatchReport::default();
            let mut keys = Vec::with_capacity(pairs.len());
            let mut records = Vec::with_capacity(pairs.len());

            for (key, doc) in pairs {
                match document_to_record(&key, &doc) {
                    Ok(record) => {
                        keys.push(key);
                        records.push(record);
                    }
                    Err(err) => report.skip(key, err.into()),
                }
            }

            if records.is_empty() {
                return report;
            }

            match self.collection.insert_many(records).await {
                Ok(outcome) => {
                    report.succeeded += outcome.inserted;
                    for failure in outcome.failures {
                        let error = MongoStoreError::WriteRejected {
                            message: failure.message,
                        };
                        match keys.get(failure.index) {
                            Some(key) => report.skip(key.as_str(), error.into()),
                            None => tracing::warn!(
                                index = failure.index,
                                error = %error,
                                "insert failure refers to an unknown batch position"
                            ),
                        }
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::error!(error = %message, "bulk insert failed");
                    for key in keys {
                        report.record_skip(key, batch_failed(&message));
                    }
                }
            }
            report
        }
        .instrument(span)
        .await
    }

    async fn mget(&self, keys: &[String]) -> Vec<Document> {
        let span = tracing::info_span!("mongodb_mget", batch_size = keys.len());

        async move {
            let mut documents = Vec::new();
            if keys.is_empty() {
                return documents;
            }

            let filter = KeyFilter::Ids(keys.to_vec());
            let mut records = match self.collection.find(&filter, None).await {
                Ok(records) => records,
                Err(err) => {
                    tracing::error!(error = %err, "find failed");
                    return documents;
                }
            };

            while let Some(item) = records.next().await {
                match item {
                    Ok(record) => {
                        let key = record_key(&record).unwrap_or_default().to_string();
                        match record_to_document(record) {
                            Ok(doc) => documents.push(doc),
                            Err(err) => {
                                tracing::error!(key = %key, error = %err, "skipping key")
                            }
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "cursor failed");
                        break;
                    }
                }
            }
            documents
        }
        .instrument(span)
        .await
    }

    async fn mdelete(&self, keys: &[String]) -> BatchReport {
        let span = tracing::info_span!("mongodb_mdelete", batch_size = keys.len());

        async move {
            let mut report = BatchReport::default();
            if keys.is_empty() {
                return report;
            }

            match self
                .collection
                .delete_many(&KeyFilter::Ids(keys.to_vec()))
                .await
            {
                Ok(deleted) => {
                    tracing::debug!(deleted, "delete_many completed");
                    report.succeeded = keys.len();
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::error!(error = %message, "delete_many failed");
                    for key in keys {
                        report.record_skip(key.as_str(), batch_failed(&message));
                    }
                }
            }
            report
        }
        .instrument(span)
        .await
    }

    fn yield_keys<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a> {
        let filter = KeyFilter::for_prefix(normalize_prefix(prefix));

        let ids = stream::once(async move {
            self.collection
                .find(&filter, Some(KEY_PROJECTION))
                .await
        })
        .try_flatten()
        .filter_map(|item| {
            future::ready(match item {
                Ok(record) => match record_key(&record) {
                    Some(key) => Some(Ok(key.to_string())),
                    None => {
                        tracing::warn!("record without a string id; skipping");
                        None
                    }
                },
                Err(err) => Some(Err(err)),
            })
        })
        .boxed();

        keys_until_error(ids)
    }
}
