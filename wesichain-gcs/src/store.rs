use bytes::Bytes;
use tracing::Instrument;
use wesichain_core::mapping_store::{keys_until_error, normalize_prefix};
use wesichain_core::{BatchReport, Document, KeyStream, MappingStore, Record, StoreError};

use crate::{BlobStorage, GcsHttpClient, GcsStoreBuilder, GcsStoreError};

/// Mapping store keeping one JSON object per key in a bucket.
///
/// Every key is handled on its own: a failed write, read or delete is logged
/// and skipped without affecting the rest of the batch. `mget` returns
/// documents in input key order.
#[derive(Clone, Debug)]
pub struct GcsDocumentStore<B = GcsHttpClient> {
    blobs: B,
}

impl GcsDocumentStore<GcsHttpClient> {
    pub fn builder() -> GcsStoreBuilder {
        GcsStoreBuilder::new()
    }

    pub fn bucket(&self) -> &str {
        self.blobs.bucket()
    }
}

impl<B> GcsDocumentStore<B> {
    pub fn new(blobs: B) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }
}

impl<B: BlobStorage> GcsDocumentStore<B> {
    // An empty object name addresses the bucket's object listing, not an object.
    async fn write_document(&self, key: &str, doc: &Document) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(GcsStoreError::EmptyKey.into());
        }

        let payload = Record::from(doc).to_json_bytes()?;
        self.blobs
            .write(key, Bytes::from(payload))
            .await
            .map_err(StoreError::from)
    }

    async fn read_document(&self, key: &str) -> Result<Option<Document>, StoreError> {
        if key.is_empty() || !self.blobs.exists(key).await? {
            return Ok(None);
        }

        let payload = self.blobs.read(key).await?;
        let record = Record::from_json_bytes(&payload)?;
        Ok(Some(Document::from(record)))
    }
}

#[async_trait::async_trait]
impl<B: BlobStorage> MappingStore for GcsDocumentStore<B> {
    async fn mset(&self, pairs: Vec<(String, Document)>) -> BatchReport {
        let span = tracing::info_span!("gcs_mset", batch_size = pairs.len());

        async move {
            let mut report = BatchReport::default();
            for (key, doc) in pairs {
                match self.write_document(&key, &doc).await {
                    Ok(()) => report.record_success(),
                    Err(err) => report.skip(key, err),
                }
            }
            report
        }
        .instrument(span)
        .await
    }

    async fn mget(&self, keys: &[String]) -> Vec<Document> {
        let span = tracing::info_span!("gcs_mget", batch_size = keys.len());

        async move {
            let mut documents = Vec::with_capacity(keys.len());
            for key in keys {
                match self.read_document(key).await {
                    Ok(Some(doc)) => documents.push(doc),
                    Ok(None) => {}
                    Err(err) => tracing::error!(key = %key, error = %err, "skipping key"),
                }
            }
            documents
        }
        .instrument(span)
        .await
    }

    async fn mdelete(&self, keys: &[String]) -> BatchReport {
        let span = tracing::info_span!("gcs_mdelete", batch_size = keys.len());

        async move {
            let mut report = BatchReport::default();
            for key in keys {
                if key.is_empty() {
                    report.skip(key.as_str(), GcsStoreError::EmptyKey.into());
                    continue;
                }
                match self.blobs.delete(key).await {
                    Ok(()) => report.record_success(),
                    Err(err) => report.skip(key.as_str(), err.into()),
                }
            }
            report
        }
        .instrument(span)
        .await
    }

    fn yield_keys<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a> {
        keys_until_error(self.blobs.list(normalize_prefix(prefix)))
    }
}
