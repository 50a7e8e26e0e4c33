use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Malformed payload in frame {frame:?}: {source}")]
    MalformedPayload {
        frame: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StreamError>;
