pub mod accumulator;
pub mod buffer_utils;
pub mod error;
pub mod payload;
pub mod render;

pub use accumulator::ResponseAccumulator;
pub use buffer_utils::{ChunkDecoder, EventFrame, FrameSplitter, SseDecoder};
pub use error::{Result, StreamError};
pub use payload::PayloadIncrement;
pub use render::{Formatter, PlainText, RenderSurface};
