//! Shared document model and the mapping store contract implemented by the
//! Wesichain storage backends.

mod document;
mod error;
pub mod mapping_store;
pub mod record;
mod value;

pub use document::Document;
pub use error::{StoreError, WesichainError};
pub use mapping_store::{BatchReport, KeyStream, MappingStore, SkippedKey};
pub use record::Record;
pub use value::{value_type_name, IntoValue, TryFromValue, Value};
