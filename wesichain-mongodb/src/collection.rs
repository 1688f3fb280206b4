use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use mongodb::bson::{Bson, Document as BsonDocument};
use mongodb::error::ErrorKind;
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::filter::ID_FIELD;
use crate::{KeyFilter, MongoStoreError};

pub type RecordStream = BoxStream<'static, Result<BsonDocument, MongoStoreError>>;

/// A record the collection refused, identified by its position in the batch.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertFailure {
    pub index: usize,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsertOutcome {
    pub inserted: usize,
    pub failures: Vec<InsertFailure>,
}

impl InsertOutcome {
    /// Outcome of a batch of `submitted` records of which `failures` were
    /// rejected and every other record was written.
    pub fn with_failures(submitted: usize, failures: Vec<InsertFailure>) -> Self {
        Self {
            inserted: submitted.saturating_sub(failures.len()),
            failures,
        }
    }
}

/// Unique ascending index on the key field. Without it a second insert under
/// an existing key stores a duplicate record instead of being rejected.
pub fn key_index_model() -> IndexModel {
    let mut keys = BsonDocument::new();
    keys.insert(ID_FIELD, 1);

    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

/// Creates the unique key index if it does not exist yet.
pub async fn ensure_key_index(
    collection: &Collection<BsonDocument>,
) -> Result<(), MongoStoreError> {
    match collection.create_index(key_index_model()).await {
        Ok(result) => {
            tracing::debug!(
                collection = %collection.name(),
                index = %result.index_name,
                "key index ready"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(
                collection = %collection.name(),
                error = %err,
                "failed to create unique key index"
            );
            Err(err.into())
        }
    }
}

/// Collection operations the document store needs from a document database.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Inserts `records` without ordering guarantees: a rejected record does
    /// not prevent the others from being inserted. Per-record rejections are
    /// reported in the outcome rather than as an error.
    async fn insert_many(
        &self,
        records: Vec<BsonDocument>,
    ) -> Result<InsertOutcome, MongoStoreError>;

    /// Streams records selected by `filter`. When `projection` is set only
    /// those fields are returned.
    async fn find(
        &self,
        filter: &KeyFilter,
        projection: Option<&[&str]>,
    ) -> Result<RecordStream, MongoStoreError>;

    async fn delete_many(&self, filter: &KeyFilter) -> Result<u64, MongoStoreError>;
}

#[async_trait]
impl DocumentCollection for Collection<BsonDocument> {
    async fn insert_many(
        &self,
        records: Vec<BsonDocument>,
    ) -> Result<InsertOutcome, MongoStoreError> {
        let submitted = records.len();

        match Collection::insert_many(self, records).ordered(false).await {
            Ok(result) => Ok(InsertOutcome {
                inserted: result.inserted_ids.len(),
                failures: Vec::new(),
            }),
            Err(err) => match err.kind.as_ref() {
                ErrorKind::InsertMany(failure) => {
                    // A write concern error does not undo the writes that were applied.
                    if let Some(concern) = &failure.write_concern_error {
                        tracing::warn!(
                            code = concern.code,
                            detail = %concern.message,
                            "bulk insert write concern not satisfied"
                        );
                    }

                    let failures = failure
                        .write_errors
                        .iter()
                        .flatten()
                        .map(|write_error| InsertFailure {
                            index: write_error.index,
                            message: write_error.message.clone(),
                        })
                        .collect();

                    Ok(InsertOutcome::with_failures(submitted, failures))
                }
                _ => Err(MongoStoreError::from(err)),
            },
        }
    }

    async fn find(
        &self,
        filter: &KeyFilter,
        projection: Option<&[&str]>,
    ) -> Result<RecordStream, MongoStoreError> {
        let mut action = Collection::find(self, filter.to_document());
        if let Some(fields) = projection {
            action = action.projection(projection_document(fields));
        }

        let cursor = action.await?;
        Ok(cursor
            .map(|record| record.map_err(MongoStoreError::from))
            .boxed())
    }

    async fn delete_many(&self, filter: &KeyFilter) -> Result<u64, MongoStoreError> {
        let result = Collection::delete_many(self, filter.to_document()).await?;
        Ok(result.deleted_count)
    }
}

fn projection_document(fields: &[&str]) -> BsonDocument {
    fields
        .iter()
        .map(|field| (field.to_string(), Bson::Int32(1)))
        .collect()
}
