#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use std::sync::Mutex;

use docqa_client::{
    ByteStream, ClientError, ConversationView, DocumentClient, DocumentList, DocumentListView,
    DocumentRecord, ResponseId, Role, SearchResponse, StatusLine, UploadFile, UploadResponse,
};

/// How the fake answers `/chat`
#[derive(Clone)]
pub enum ChatScript {
    Chunks(Vec<Vec<u8>>),
    ChunksThenError(Vec<Vec<u8>>, String),
    Status(StatusCode),
}

/// Scripted in-memory `DocumentClient` that records every call
pub struct FakeClient {
    chat: ChatScript,
    search_fails: bool,
    documents: Result<DocumentList, StatusCode>,
    upload: Result<UploadResponse, (StatusCode, String)>,
    calls: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn streaming(chunks: Vec<Vec<u8>>) -> Self {
        Self::with_chat(ChatScript::Chunks(chunks))
    }

    pub fn with_chat(chat: ChatScript) -> Self {
        Self {
            chat,
            search_fails: false,
            documents: Ok(DocumentList::default()),
            upload: Ok(UploadResponse {
                message: "Document uploaded.".to_string(),
                document_id: Some(1),
                chunks_count: Some(4),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    pub fn with_documents(mut self, documents: Result<DocumentList, StatusCode>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_upload(mut self, upload: Result<UploadResponse, (StatusCode, String)>) -> Self {
        self.upload = upload;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn status_error(status: StatusCode, message: &str) -> ClientError {
    ClientError::Status {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl DocumentClient for FakeClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, ClientError> {
        self.record(format!("search:{}", query));
        if self.search_fails {
            return Err(status_error(StatusCode::INTERNAL_SERVER_ERROR, "search failed"));
        }
        Ok(SearchResponse {
            message: None,
            results: vec![serde_json::json!({"chunk_id": 1})],
        })
    }

    async fn chat_stream(&self, query: &str) -> Result<ByteStream, ClientError> {
        self.record(format!("chat:{}", query));

        let items: Vec<Result<Bytes, ClientError>> = match self.chat.clone() {
            ChatScript::Status(status) => return Err(status_error(status, "boom")),
            ChatScript::Chunks(chunks) => chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect(),
            ChatScript::ChunksThenError(chunks, error) => chunks
                .into_iter()
                .map(|c| Ok(Bytes::from(c)))
                .chain(std::iter::once(Err(ClientError::StreamRead(error))))
                .collect(),
        };

        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, ClientError> {
        self.record(format!("upload:{}", file.filename));
        self.upload
            .clone()
            .map_err(|(status, message)| status_error(status, &message))
    }

    async fn list_documents(&self) -> Result<DocumentList, ClientError> {
        self.record("documents".to_string());
        self.documents
            .clone()
            .map_err(|status| status_error(status, "unavailable"))
    }
}

/// Everything a view was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Message(Role, String),
    BeginResponse(ResponseId),
    Render(ResponseId, String),
    Scroll,
    Clear,
    Document(String),
    Placeholder(String),
    Status(String),
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
    next_id: usize,
}

impl RecordingView {
    pub fn renders(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Render(_, markup) => Some(markup.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<(Role, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Message(role, text) => Some((*role, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn scrolls(&self) -> usize {
        self.events.iter().filter(|e| **e == ViewEvent::Scroll).count()
    }
}

impl ConversationView for RecordingView {
    fn append_message(&mut self, role: Role, text: &str) {
        self.events.push(ViewEvent::Message(role, text.to_string()));
    }

    fn begin_response(&mut self) -> ResponseId {
        let id = ResponseId(self.next_id);
        self.next_id += 1;
        self.events.push(ViewEvent::BeginResponse(id));
        id
    }

    fn render_response(&mut self, id: ResponseId, markup: &str) {
        self.events.push(ViewEvent::Render(id, markup.to_string()));
    }

    fn scroll_to_bottom(&mut self) {
        self.events.push(ViewEvent::Scroll);
    }
}

impl DocumentListView for RecordingView {
    fn clear(&mut self) {
        self.events.push(ViewEvent::Clear);
    }

    fn push_document(&mut self, record: &DocumentRecord) {
        self.events.push(ViewEvent::Document(record.filename.clone()));
    }

    fn show_placeholder(&mut self, text: &str) {
        self.events.push(ViewEvent::Placeholder(text.to_string()));
    }
}

impl StatusLine for RecordingView {
    fn set_status(&mut self, text: &str) {
        self.events.push(ViewEvent::Status(text.to_string()));
    }
}

pub fn frame(content: &str) -> Vec<u8> {
    format!("data: {}\n\n", serde_json::json!({"content": content, "done": false})).into_bytes()
}
