//! MongoDB document store for Wesichain.
//!
//! [`MongoDocumentStore`] implements [`wesichain_core::MappingStore`] on top of
//! a collection whose records look like
//! `{"id": key, "page_content": ..., "metadata": {...}}`. The collection is
//! reached through the [`DocumentCollection`] capability trait, implemented
//! for [`mongodb::Collection`].
//!
//! Environment variables commonly used with [`MongoStoreBuilder`]:
//! - `MONGODB_URI`
//! - `MONGODB_DATABASE`
//! - `MONGODB_COLLECTION`

mod collection;
mod config;
mod error;
pub mod filter;
pub mod mapper;
mod store;

pub use collection::{
    ensure_key_index, key_index_model, DocumentCollection, InsertFailure, InsertOutcome,
    RecordStream,
};
pub use config::MongoStoreBuilder;
pub use error::MongoStoreError;
pub use filter::KeyFilter;
pub use store::MongoDocumentStore;
