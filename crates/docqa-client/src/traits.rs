use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::error::Result;
use crate::types::{DocumentList, SearchResponse, UploadFile, UploadResponse};

/// Raw body of a streamed chat response, chunk by chunk in arrival order
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Trait for the document-query service
///
/// The HTTP implementation is `HttpDocumentClient`; controllers only depend
/// on this trait so they can run against any transport.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Look up reference sources for a query (`POST /search`)
    async fn search(&self, query: &str) -> Result<SearchResponse>;

    /// Start a streamed answer (`POST /chat`). Fails on transport errors and
    /// non-success statuses; the returned stream yields the raw body.
    async fn chat_stream(&self, query: &str) -> Result<ByteStream>;

    /// Upload a document (`POST /upload`)
    async fn upload(&self, file: UploadFile) -> Result<UploadResponse>;

    /// List uploaded documents (`GET /documents`)
    async fn list_documents(&self) -> Result<DocumentList>;
}
