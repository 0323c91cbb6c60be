//! REST client for the hosted table (PostgREST) and storage endpoints.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use url::Url;

use huma_core::row::{ProjectRow, ProjectRowPayload};
use huma_core::types::ProjectId;

use crate::config::SupabaseConfig;
use crate::error::{ClientBuildError, TransportError};
use crate::remote::{ObjectStorage, ProjectTable};

/// HTTP client for one hosted project.
pub struct SupabaseClient {
    client: reqwest::Client,
    base: Url,
    key: String,
    table: String,
    bucket: String,
}

impl SupabaseClient {
    /// Create a client for the configured project.
    ///
    /// Fails when the base URL does not parse or cannot carry a path, or
    /// when the HTTP client cannot be built with the configured timeout.
    pub fn new(config: &SupabaseConfig) -> Result<Self, ClientBuildError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Self::with_client(client, config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        config: &SupabaseConfig,
    ) -> Result<Self, ClientBuildError> {
        let base = Url::parse(&config.url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        Ok(Self {
            client,
            base,
            key: config.key.clone(),
            table: config.table.clone(),
            bucket: config.bucket.clone(),
        })
    }

    // ---- private helpers ----

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn table_url(&self) -> Url {
        self.endpoint(["rest", "v1", self.table.as_str()])
    }

    fn object_url<'a>(&'a self, prefix: &[&'a str], path: &'a str) -> Url {
        self.endpoint(
            ["storage", "v1", "object"]
                .into_iter()
                .chain(prefix.iter().copied())
                .chain([self.bucket.as_str()])
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`TransportError::Api`] with the status
    /// and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), TransportError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectTable for SupabaseClient {
    async fn select_all(&self) -> Result<Vec<ProjectRow>, TransportError> {
        let mut url = self.table_url();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.request(Method::GET, url).send().await?;
        let response = Self::ensure_success(response).await?;
        let rows: Vec<ProjectRow> = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        tracing::debug!(count = rows.len(), table = %self.table, "Fetched project rows");
        Ok(rows)
    }

    async fn insert(&self, row: &ProjectRowPayload) -> Result<(), TransportError> {
        let response = self
            .request(Method::POST, self.table_url())
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await?;

        Self::check_status(response).await
    }

    async fn update(&self, id: &ProjectId, row: &ProjectRowPayload) -> Result<(), TransportError> {
        let mut url = self.table_url();
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));

        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        Self::check_status(response).await
    }
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), TransportError> {
        let size = bytes.len();
        let response = self
            .request(Method::POST, self.object_url(&[], path))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .header("cache-control", "3600")
            .body(bytes)
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::info!(path, size, bucket = %self.bucket, "Uploaded media object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.object_url(&["public"], path).to_string()
    }
}
