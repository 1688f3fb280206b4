//! Wire form shared by every mapping store backend.
//!
//! A [`Record`] is the `{ "page_content": ..., "metadata": {...} }` shape that
//! backends persist. Decoding is lossy-safe: a missing or `null` field falls
//! back to its default instead of failing.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Document, StoreError, Value};

pub const CONTENT_FIELD: &str = "page_content";
pub const METADATA_FIELD: &str = "metadata";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, Value>,
}

impl From<&Document> for Record {
    fn from(doc: &Document) -> Self {
        Self {
            page_content: doc.content.clone(),
            metadata: doc.metadata.clone(),
        }
    }
}

impl From<Record> for Document {
    fn from(record: Record) -> Self {
        Document {
            content: record.page_content,
            metadata: record.metadata,
        }
    }
}

impl Record {
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(self).map_err(|err| StoreError::Internal(Box::new(err)))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let text = std::str::from_utf8(bytes).map_err(StoreError::malformed)?;
        serde_json::from_str(text).map_err(StoreError::malformed)
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
