use thiserror::Error;
use wesichain_core::StoreError;

#[derive(Debug, Error)]
pub enum GcsStoreError {
    #[error("invalid configuration: bucket is required")]
    MissingBucket,
    #[error("invalid configuration: bucket cannot be empty")]
    EmptyBucket,
    #[error("invalid configuration: invalid base_url: {0}")]
    InvalidBaseUrl(String),
    #[error("object name cannot be empty")]
    EmptyKey,
    #[error("gcs request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("object '{path}' not found in bucket '{bucket}'")]
    ObjectNotFound { bucket: String, path: String },
    #[error("gcs returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("invalid gcs response: {message}")]
    InvalidResponse { message: String },
}

impl From<GcsStoreError> for StoreError {
    fn from(value: GcsStoreError) -> Self {
        StoreError::Internal(Box::new(value))
    }
}
