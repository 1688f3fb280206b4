//! Google Cloud Storage document store for Wesichain.
//!
//! [`GcsDocumentStore`] implements [`wesichain_core::MappingStore`] by storing
//! each document as a JSON object (`{"page_content": ..., "metadata": ...}`)
//! whose object name is the key. The bucket is reached through the
//! [`BlobStorage`] capability trait; [`GcsHttpClient`] talks to the Cloud
//! Storage JSON API.
//!
//! Environment variables commonly used with [`GcsStoreBuilder`]:
//! - `GCS_BUCKET`
//! - `GCS_ACCESS_TOKEN` (optional, OAuth2 bearer token)
//! - `GCS_BASE_URL` (optional, e.g. a local emulator)

mod blob;
pub mod client;
mod config;
mod error;
mod store;

pub use blob::BlobStorage;
pub use client::GcsHttpClient;
pub use config::{GcsStoreBuilder, DEFAULT_BASE_URL};
pub use error::GcsStoreError;
pub use store::GcsDocumentStore;
