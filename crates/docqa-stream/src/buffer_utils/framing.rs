/// Blank line terminating an event-stream frame
pub const FRAME_DELIMITER: &str = "\n\n";

/// Marker opening a data line
pub const DATA_MARKER: &str = "data:";

/// One delimited unit of the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    raw: String,
}

impl EventFrame {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Payload of a data frame, or `None` for frames that do not start with
    /// the data marker. Several `data:` lines are joined with `\n`.
    pub fn data(&self) -> Option<String> {
        if !self.raw.starts_with(DATA_MARKER) {
            return None;
        }

        let lines: Vec<&str> = self
            .raw
            .lines()
            .filter_map(|line| line.strip_prefix(DATA_MARKER))
            .map(|value| value.strip_prefix(' ').unwrap_or(value))
            .collect();

        Some(lines.join("\n"))
    }
}

/// Splits decoded text into frames, carrying the trailing partial frame
/// over to the next chunk
#[derive(Debug, Default)]
pub struct FrameSplitter {
    remainder: String,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append decoded text and iterate over the frames it completes.
    /// Frames not consumed before the iterator is dropped stay buffered.
    pub fn push(&mut self, text: &str) -> Frames<'_> {
        self.remainder.push_str(text);
        Frames {
            splitter: self,
            cursor: 0,
        }
    }

    /// End of stream: whatever is left is the last frame, if it has content
    pub fn finish(&mut self) -> Option<EventFrame> {
        let rest = std::mem::take(&mut self.remainder);
        let rest = rest.trim_matches('\n');
        if rest.trim().is_empty() {
            None
        } else {
            Some(EventFrame::new(rest))
        }
    }

    /// Bytes of the partial frame still waiting for a delimiter
    pub fn buffered_len(&self) -> usize {
        self.remainder.len()
    }
}

/// Lazy iterator over complete frames; compacts the splitter when dropped
pub struct Frames<'a> {
    splitter: &'a mut FrameSplitter,
    cursor: usize,
}

impl Iterator for Frames<'_> {
    type Item = EventFrame;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.splitter.remainder[self.cursor..];
            let end = rest.find(FRAME_DELIMITER)?;
            // Extra newlines after a delimiter belong to no frame
            let frame = rest[..end].trim_start_matches('\n');
            self.cursor += end + FRAME_DELIMITER.len();

            if !frame.is_empty() {
                return Some(EventFrame::new(frame));
            }
        }
    }
}

impl Drop for Frames<'_> {
    fn drop(&mut self) {
        self.splitter.remainder.drain(..self.cursor);
    }
}
