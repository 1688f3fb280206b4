use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Value;

/// A unit of text stored under an externally supplied key.
///
/// Documents carry no identity of their own; the key lives in the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub content: String,
    #[serde(default, deserialize_with = "crate::record::null_as_default")]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
