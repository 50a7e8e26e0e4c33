// HTTP implementation of the document-query service client

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::traits::{ByteStream, DocumentClient};
use crate::types::{DocumentList, SearchResponse, UploadFile, UploadResponse};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Client for the document-query HTTP API
#[derive(Debug, Clone)]
pub struct HttpDocumentClient {
    http_client: reqwest::Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl HttpDocumentClient {
    /// Create a client for `base_url` with default timeouts
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> HttpDocumentClientBuilder {
        HttpDocumentClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Apply the request timeout to calls with a bounded response.
    /// Streamed chat bodies are never timed out as a whole.
    fn bounded(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }
}

/// Builder for HttpDocumentClient
#[derive(Default)]
pub struct HttpDocumentClientBuilder {
    base_url: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl HttpDocumentClientBuilder {
    /// Server root, e.g. "http://localhost:8000"
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Timeout for search, upload and listing calls
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpDocumentClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Remove trailing slash so paths can be appended
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(HttpDocumentClient {
            http_client,
            base_url,
            request_timeout: self.request_timeout,
        })
    }
}

// ============================================================================
// TRAIT IMPLEMENTATION
// ============================================================================

#[async_trait]
impl DocumentClient for HttpDocumentClient {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        let response = self
            .bounded(self.http_client.post(self.url("/search")))
            .form(&[("query", query)])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn chat_stream(&self, query: &str) -> Result<ByteStream> {
        let response = self
            .http_client
            .post(self.url("/chat"))
            .form(&[("query", query)])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        debug!("Chat stream opened ({})", response.status());

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| ClientError::StreamRead(e.to_string())));
        Ok(Box::pin(stream))
    }

    async fn upload(&self, file: UploadFile) -> Result<UploadResponse> {
        let size = file.bytes.len();
        let part = Part::bytes(file.bytes).file_name(file.filename.clone());
        let form = Form::new().part("file", part);

        debug!("Uploading {} ({} bytes)", file.filename, size);

        let response = self
            .bounded(self.http_client.post(self.url("/upload")))
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn list_documents(&self) -> Result<DocumentList> {
        let response = self
            .bounded(self.http_client.get(self.url("/documents")))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

/// Error body used by the server for rejected requests
#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorDetail>(&body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| body.trim().to_string());

    Err(ClientError::Status { status, message })
}
