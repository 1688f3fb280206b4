use std::fmt;

use crate::{GcsDocumentStore, GcsHttpClient, GcsStoreError};

pub const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";

#[derive(Default, Clone)]
pub struct GcsStoreBuilder {
    bucket: Option<String>,
    base_url: Option<String>,
    access_token: Option<String>,
}

impl fmt::Debug for GcsStoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let access_token = if self.access_token.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("GcsStoreBuilder")
            .field("bucket", &self.bucket)
            .field("base_url", &self.base_url)
            .field("access_token", &access_token)
            .finish()
    }
}

impl GcsStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(mut self, value: impl Into<String>) -> Self {
        self.bucket = Some(value.into());
        self
    }

    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn access_token(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.access_token = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
        self
    }

    pub fn bucket_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.bucket = Some(value);
        }
        self
    }

    pub fn base_url_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.base_url = Some(value);
        }
        self
    }

    pub fn access_token_from_env(self, var_name: &str) -> Self {
        match std::env::var(var_name) {
            Ok(value) => self.access_token(value),
            Err(_) => self,
        }
    }

    pub fn build(self) -> Result<GcsDocumentStore, GcsStoreError> {
        let bucket = self.bucket.ok_or(GcsStoreError::MissingBucket)?;
        if bucket.trim().is_empty() {
            return Err(GcsStoreError::EmptyBucket);
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let client = GcsHttpClient::new(base_url, bucket)?;

        let client = match self.access_token {
            Some(token) => client.with_access_token(token),
            None => {
                if client.base_url() == DEFAULT_BASE_URL {
                    tracing::warn!(
                        bucket = %client.bucket(),
                        "no access token configured for Cloud Storage; only public buckets will be readable"
                    );
                }
                client
            }
        };

        Ok(GcsDocumentStore::new(client))
    }
}
