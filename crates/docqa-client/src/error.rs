use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to read response stream: {0}")]
    StreamRead(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// Why a chat session ended in `Failed`
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Network failure: {0}")]
    NetworkFailure(#[source] ClientError),

    #[error("Stream read failure: {0}")]
    StreamReadFailure(#[source] ClientError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
