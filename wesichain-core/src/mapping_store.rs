use std::fmt;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

use crate::value::value_type_name;
use crate::{Document, StoreError, TryFromValue, Value};

/// Lazy, single-pass sequence of stored keys.
///
/// Dropping the stream before it is exhausted stops the backend from fetching
/// further pages.
pub type KeyStream<'a> = BoxStream<'a, String>;

/// A key-to-document store with best-effort batch semantics.
///
/// None of the operations surface errors: failures are logged and the
/// affected key is skipped, so one bad record never aborts a batch. Write and
/// delete batches return a [`BatchReport`] describing what was skipped.
#[async_trait]
pub trait MappingStore: Send + Sync {
    async fn mset(&self, pairs: Vec<(String, Document)>) -> BatchReport;

    /// Like [`mset`](MappingStore::mset) for untyped input. Values that do not
    /// decode into a [`Document`] are logged and skipped.
    async fn mset_values(&self, pairs: Vec<(String, Value)>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut documents = Vec::with_capacity(pairs.len());

        for (key, value) in pairs {
            match document_from_value(value) {
                Ok(doc) => documents.push((key, doc)),
                Err(err) => report.skip(key, err),
            }
        }

        if !documents.is_empty() {
            report.merge(self.mset(documents).await);
        }
        report
    }

    /// Returns the documents found for `keys`. Missing or unreadable keys are
    /// omitted; result order is backend-defined.
    async fn mget(&self, keys: &[String]) -> Vec<Document>;

    async fn mdelete(&self, keys: &[String]) -> BatchReport;

    /// Streams every key starting with `prefix`, or every key when `prefix` is
    /// `None` or empty. Each call starts a fresh listing.
    fn yield_keys<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a>;
}

pub fn document_from_value(value: Value) -> Result<Document, StoreError> {
    let kind = value_type_name(&value);
    Document::try_from_value(value)
        .map_err(|err| StoreError::NotADocument(format!("{kind} ({err})")))
}

/// Treats an empty prefix the same as no prefix.
pub fn normalize_prefix(prefix: Option<&str>) -> Option<&str> {
    prefix.filter(|prefix| !prefix.is_empty())
}

/// Ends a fallible key listing at its first error, logging it.
pub fn keys_until_error<'a, E>(stream: BoxStream<'a, Result<String, E>>) -> KeyStream<'a>
where
    E: fmt::Display + Send + 'a,
{
    stream
        .scan((), |_, item| {
            futures::future::ready(match item {
                Ok(key) => Some(key),
                Err(err) => {
                    tracing::error!(error = %err, "key listing failed");
                    None
                }
            })
        })
        .boxed()
}

#[derive(Debug)]
pub struct SkippedKey {
    pub key: String,
    pub error: StoreError,
}

/// Outcome of a best-effort batch operation.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Keys processed without error. For deletes this includes keys that
    /// were already absent, so it is not a count of removed records.
    pub succeeded: usize,
    pub skipped: Vec<SkippedKey>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn skipped_keys(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(|skipped| skipped.key.as_str())
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Records a skipped key and logs it at `error` level.
    pub fn skip(&mut self, key: impl Into<String>, error: StoreError) {
        let key = key.into();
        tracing::error!(key = %key, error = %error, "skipping key");
        self.skipped.push(SkippedKey { key, error });
    }

    /// Records a skipped key without logging; for batch-wide failures that
    /// were already logged once.
    pub fn record_skip(&mut self, key: impl Into<String>, error: StoreError) {
        self.skipped.push(SkippedKey {
            key: key.into(),
            error,
        });
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.succeeded += other.succeeded;
        self.skipped.extend(other.skipped);
    }
}
