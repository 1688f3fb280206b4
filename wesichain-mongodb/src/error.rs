use mongodb::bson;
use thiserror::Error;
use wesichain_core::StoreError;

#[derive(Debug, Error)]
pub enum MongoStoreError {
    #[error("invalid configuration: connection_string is required")]
    MissingConnectionString,
    #[error("invalid configuration: connection_string cannot be empty")]
    EmptyConnectionString,
    #[error("invalid configuration: database is required")]
    MissingDatabase,
    #[error("invalid configuration: database cannot be empty")]
    EmptyDatabase,
    #[error("invalid configuration: collection is required")]
    MissingCollection,
    #[error("invalid configuration: collection cannot be empty")]
    EmptyCollection,
    #[error("mongodb driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("failed to encode record: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("failed to decode record: {0}")]
    Decode(#[from] bson::de::Error),
    #[error("record rejected by mongodb: {message}")]
    WriteRejected { message: String },
    #[error("batch failed: {message}")]
    BatchFailed { message: String },
}

impl From<MongoStoreError> for StoreError {
    fn from(value: MongoStoreError) -> Self {
        match value {
            MongoStoreError::Decode(err) => StoreError::malformed(err),
            other => StoreError::Internal(Box::new(other)),
        }
    }
}
