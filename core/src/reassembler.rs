//! Newline-delimited record reassembly over arbitrarily chunked bytes.
//!
//! Chunk boundaries carry no meaning: a record, or a single multi-byte
//! character inside it, may be split across any number of chunks. Decoding
//! is therefore stateful. Bytes of an unfinished UTF-8 sequence wait for the
//! next chunk instead of being replaced.

use bytes::Buf;
use bytes::BytesMut;
use futures::Stream;
use futures::StreamExt;

use crate::error::AnalysisError;

/// Stateful decoder from byte chunks to complete lines.
#[derive(Debug, Default)]
pub struct LineReassembler {
    /// Undecoded bytes: the prefix of a UTF-8 sequence cut by a chunk edge.
    pending: BytesMut,
    /// Decoded text after the last newline seen so far.
    buffer: String,
}

impl LineReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every record it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        self.decode_pending();

        let mut records = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let rest = self.buffer.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.buffer, rest);
            line.pop();
            records.push(line);
        }
        records
    }

    /// Ends the input. The unterminated tail, if any, is returned for
    /// diagnostics only and never becomes a record.
    pub fn finish(self) -> Option<String> {
        let mut tail = self.buffer;
        if !self.pending.is_empty() {
            tail.push(char::REPLACEMENT_CHARACTER);
        }
        (!tail.is_empty()).then_some(tail)
    }

    #[cfg(test)]
    fn buffered(&self) -> &str {
        &self.buffer
    }

    fn decode_pending(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    // The prefix was just validated by `from_utf8`.
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        // Truncated sequence at the end: keep it for the next chunk.
                        None => {
                            self.pending.advance(valid);
                            return;
                        }
                        Some(invalid) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.advance(valid + invalid);
                        }
                    }
                }
            }
        }
    }
}

/// Turns a byte stream into a lazy stream of complete records.
///
/// A transport error is yielded once and ends the stream. When the byte
/// stream ends, an unterminated trailing record is dropped.
pub fn records<S>(chunks: S) -> impl Stream<Item = Result<String, AnalysisError>> + Send
where
    S: Stream<Item = Result<bytes::Bytes, AnalysisError>> + Send + Unpin,
{
    async_stream::stream! {
        let mut chunks = chunks;
        let mut reassembler = LineReassembler::new();
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(chunk) => {
                    for record in reassembler.push(&chunk) {
                        yield Ok(record);
                    }
                }
                Err(err) => {
                    yield Err(err);
                    return;
                }
            }
        }
        if let Some(tail) = reassembler.finish() {
            tracing::warn!(
                bytes = tail.len(),
                "stream closed with an unterminated record; discarding it"
            );
        }
    }
}
