use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::GcsStoreError;

/// Bucket operations the document store needs from an object storage client.
///
/// Paths are used verbatim as object names.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn exists(&self, path: &str) -> Result<bool, GcsStoreError>;

    async fn read(&self, path: &str) -> Result<Bytes, GcsStoreError>;

    /// Writes `data` to `path`, replacing any existing object.
    async fn write(&self, path: &str, data: Bytes) -> Result<(), GcsStoreError>;

    /// Deletes the object at `path`. Deleting a missing object is not an error.
    async fn delete(&self, path: &str) -> Result<(), GcsStoreError>;

    /// Streams object names beginning with `prefix`, fetching pages on demand.
    fn list<'a>(&'a self, prefix: Option<&'a str>) -> BoxStream<'a, Result<String, GcsStoreError>>;
}
