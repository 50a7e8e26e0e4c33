use std::char::REPLACEMENT_CHARACTER;

/// Stateful UTF-8 decoder for transport chunks
/// Holds back an incomplete trailing sequence until the next chunk completes it
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    pending: Vec<u8>,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, prefixed with whatever the previous chunk left over.
    /// Malformed bytes become U+FFFD; decoding never fails.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        let mut text = String::with_capacity(input.len());
        let mut start = 0;

        while start < input.len() {
            match std::str::from_utf8(&input[start..]) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&input[start..valid_end]));

                    match e.error_len() {
                        Some(len) => {
                            text.push(REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        None => {
                            // Truncated sequence at the end of the chunk
                            self.pending = input[valid_end..].to_vec();
                            break;
                        }
                    }
                }
            }
        }

        text
    }

    /// Flush at end of stream. A dangling partial sequence can never be
    /// completed, so it decodes to a single replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT_CHARACTER.to_string()
        }
    }

    /// Bytes held back waiting for the rest of a character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
