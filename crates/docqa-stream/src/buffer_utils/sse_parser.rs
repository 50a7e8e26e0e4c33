use tracing::debug;

use super::decoding::ChunkDecoder;
use super::framing::{EventFrame, FrameSplitter};
use crate::error::Result;
use crate::payload::PayloadIncrement;

/// Per-session decode state: byte carry-over plus frame carry-over
///
/// Feed it transport chunks in arrival order. Each result is either a parsed
/// increment or the `MalformedPayload` of a single frame; a bad frame never
/// affects the frames around it.
#[derive(Debug, Default)]
pub struct SseDecoder {
    chunks: ChunkDecoder,
    frames: FrameSplitter,
    frames_seen: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk and parse every frame it completes
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Result<PayloadIncrement>> {
        let text = self.chunks.decode(bytes);
        let mut results = Vec::new();

        for frame in self.frames.push(&text) {
            self.frames_seen += 1;
            if let Some(result) = parse_frame(&frame) {
                results.push(result);
            }
        }

        results
    }

    /// End of stream: flush any held-back bytes and a trailing frame that
    /// never got its delimiter
    pub fn finish(&mut self) -> Vec<Result<PayloadIncrement>> {
        let tail = self.chunks.finish();
        let mut results = Vec::new();

        for frame in self.frames.push(&tail) {
            self.frames_seen += 1;
            if let Some(result) = parse_frame(&frame) {
                results.push(result);
            }
        }

        if let Some(frame) = self.frames.finish() {
            debug!("Flushing undelimited trailing frame ({} bytes)", frame.raw().len());
            self.frames_seen += 1;
            if let Some(result) = parse_frame(&frame) {
                results.push(result);
            }
        }

        results
    }

    /// Complete frames seen so far, data or not
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }
}

fn parse_frame(frame: &EventFrame) -> Option<Result<PayloadIncrement>> {
    match PayloadIncrement::from_frame(frame) {
        Ok(Some(increment)) => Some(Ok(increment)),
        Ok(None) => {
            debug!("Skipping non-data frame");
            None
        }
        Err(e) => Some(Err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(results: Vec<Result<PayloadIncrement>>) -> Vec<String> {
        results
            .into_iter()
            .filter_map(|r| r.ok())
            .map(|inc| inc.content)
            .collect()
    }

    #[test]
    fn test_feed_whole_frames() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"data: {\"content\":\"a\",\"done\":false}\n\ndata: {\"content\":\"b\",\"done\":false}\n\n");
        assert_eq!(contents(out), vec!["a", "b"]);
        assert_eq!(decoder.frames_seen(), 2);
    }

    #[test]
    fn test_malformed_frame_isolated() {
        let mut decoder = SseDecoder::new();
        let out = decoder.feed(b"data: {\"content\":\"a\"}\n\ndata: {oops\n\ndata: {\"content\":\"c\"}\n\n");
        assert_eq!(out.len(), 3);
        assert!(out[1].is_err());
        assert_eq!(contents(out), vec!["a", "c"]);
    }

    #[test]
    fn test_finish_flushes_trailing_frame() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"content\":\"tail\"}").is_empty());
        assert_eq!(contents(decoder.finish()), vec!["tail"]);
    }
}
