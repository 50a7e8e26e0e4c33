mod decoding;
mod framing;
mod sse_parser;

pub use decoding::ChunkDecoder;
pub use framing::{EventFrame, FrameSplitter, Frames, DATA_MARKER, FRAME_DELIMITER};
pub use sse_parser::SseDecoder;
