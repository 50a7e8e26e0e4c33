use serde::{Deserialize, Serialize};

use crate::buffer_utils::EventFrame;
use crate::error::{Result, StreamError};

/// One unit of streamed answer text
///
/// `content` is only meaningful while `done` is false; a `done` increment
/// marks the logical end of the turn, not the end of the transport stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayloadIncrement {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub done: bool,
}

impl PayloadIncrement {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    pub fn done() -> Self {
        Self {
            content: String::new(),
            done: true,
        }
    }

    /// Parse the payload of a data frame (marker already stripped)
    pub fn parse(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|source| StreamError::MalformedPayload {
            frame: data.to_string(),
            source,
        })
    }

    /// Parse a whole frame. Frames that are not data events yield `Ok(None)`.
    pub fn from_frame(frame: &EventFrame) -> Result<Option<Self>> {
        match frame.data() {
            Some(data) => Self::parse(&data).map(Some),
            None => Ok(None),
        }
    }
}
