use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::{BlobStorage, GcsStoreError};

/// Minimal client for the Cloud Storage JSON API, scoped to one bucket.
#[derive(Clone)]
pub struct GcsHttpClient {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    access_token: Option<String>,
}

impl fmt::Debug for GcsHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let access_token = if self.access_token.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("GcsHttpClient")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .field("access_token", &access_token)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ListObjectsPage {
    #[serde(default)]
    items: Vec<ObjectName>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectName {
    name: String,
}

impl GcsHttpClient {
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Result<Self, GcsStoreError> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url)
            .map_err(|err| GcsStoreError::InvalidBaseUrl(format!("{base_url}: {err}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            access_token: None,
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn objects_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o",
            self.base_url,
            urlencoding::encode(&self.bucket)
        )
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.objects_url(), urlencoding::encode(path))
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.base_url,
            urlencoding::encode(&self.bucket)
        )
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let request = self.http.request(method, url);

        match self.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn list_page(
        &self,
        prefix: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<ListObjectsPage, GcsStoreError> {
        let mut query = vec![("fields", "items(name),nextPageToken")];
        if let Some(prefix) = prefix {
            query.push(("prefix", prefix));
        }
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token));
        }

        let response = self
            .request(Method::GET, self.objects_url())
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| GcsStoreError::InvalidResponse {
            message: format!("failed to decode object listing: {err}"),
        })
    }
}

#[async_trait]
impl BlobStorage for GcsHttpClient {
    async fn exists(&self, path: &str) -> Result<bool, GcsStoreError> {
        let response = self
            .request(Method::GET, self.object_url(path))
            .query(&[("fields", "name")])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(error_from_response(response).await),
        }
    }

    async fn read(&self, path: &str) -> Result<Bytes, GcsStoreError> {
        let response = self
            .request(Method::GET, self.object_url(path))
            .query(&[("alt", "media")])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.bytes().await?),
            StatusCode::NOT_FOUND => Err(GcsStoreError::ObjectNotFound {
                bucket: self.bucket.clone(),
                path: path.to_string(),
            }),
            _ => Err(error_from_response(response).await),
        }
    }

    async fn write(&self, path: &str, data: Bytes) -> Result<(), GcsStoreError> {
        let response = self
            .request(Method::POST, self.upload_url())
            .query(&[("uploadType", "media"), ("name", path)])
            .header(CONTENT_TYPE, "application/json")
            .body(data)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), GcsStoreError> {
        let response = self
            .request(Method::DELETE, self.object_url(path))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::debug!(bucket = %self.bucket, path, "object already absent");
                Ok(())
            }
            _ => Err(error_from_response(response).await),
        }
    }

    fn list<'a>(&'a self, prefix: Option<&'a str>) -> BoxStream<'a, Result<String, GcsStoreError>> {
        let listing = Listing {
            client: self,
            prefix,
            buffered: VecDeque::new(),
            next_page: None,
            started: false,
        };

        stream::try_unfold(listing, Listing::advance).boxed()
    }
}

struct Listing<'a> {
    client: &'a GcsHttpClient,
    prefix: Option<&'a str>,
    buffered: VecDeque<String>,
    next_page: Option<String>,
    started: bool,
}

impl<'a> Listing<'a> {
    async fn advance(mut self) -> Result<Option<(String, Self)>, GcsStoreError> {
        loop {
            if let Some(name) = self.buffered.pop_front() {
                return Ok(Some((name, self)));
            }
            if self.started && self.next_page.is_none() {
                return Ok(None);
            }

            let page = self
                .client
                .list_page(self.prefix, self.next_page.as_deref())
                .await?;
            self.started = true;
            self.next_page = page.next_page_token.filter(|token| !token.is_empty());
            self.buffered
                .extend(page.items.into_iter().map(|item| item.name));
        }
    }
}

#[derive(Debug, Deserialize)]
struct GcsErrorEnvelope {
    error: GcsErrorBody,
}

#[derive(Debug, Deserialize)]
struct GcsErrorBody {
    message: String,
}

async fn error_from_response(response: Response) -> GcsStoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    GcsStoreError::HttpStatus {
        status,
        message: gcs_error_message(&body),
    }
}

fn gcs_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "unknown gcs error".to_string();
    }

    serde_json::from_str::<GcsErrorEnvelope>(trimmed)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_envelope() {
        let body = r#"{"error": {"code": 403, "message": "access denied"}}"#;
        assert_eq!(gcs_error_message(body), "access denied");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(gcs_error_message("  bad gateway \n"), "bad gateway");
        assert_eq!(gcs_error_message(""), "unknown gcs error");
    }

    #[test]
    fn object_names_are_percent_encoded() {
        let client = GcsHttpClient::new("https://storage.googleapis.com/", "docs").unwrap();
        assert_eq!(
            client.object_url("a/b c"),
            "https://storage.googleapis.com/storage/v1/b/docs/o/a%2Fb%20c"
        );
    }

    #[test]
    fn debug_redacts_access_token() {
        let client = GcsHttpClient::new("http://localhost:4443", "docs")
            .unwrap()
            .with_access_token("secret-token");
        let rendered = format!("{client:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret-token"));
    }
}
