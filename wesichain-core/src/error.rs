use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WesichainError {
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}

impl From<StoreError> for WesichainError {
    fn from(err: StoreError) -> Self {
        WesichainError::Custom(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("expected Document, got {0}")]
    NotADocument(String),
    #[error("malformed record: {0}")]
    MalformedRecord(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Store error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    pub fn malformed(err: impl StdError + Send + Sync + 'static) -> Self {
        StoreError::MalformedRecord(Box::new(err))
    }
}
