//! Incremental UTF-8 decoding.
//!
//! Chunk boundaries fall wherever the transport cuts them, including in the
//! middle of a multi-byte character. The decoder carries the incomplete
//! tail (at most 3 bytes) into the next chunk, so the decoded text is
//! exactly what a single-pass decode of the whole body would produce.
//! Decoding is strict: any invalid sequence stops the pipeline.

/// Invalid input encountered by [`StreamDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid utf-8 byte sequence in origin body")]
    Invalid,
    #[error("origin body ended inside a multi-byte utf-8 sequence")]
    Truncated,
}

/// Stateful UTF-8 decoder for a chunked byte stream.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Incomplete multi-byte sequence left over from the previous chunk.
    carry: Vec<u8>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning the text that is complete so far.
    ///
    /// A trailing incomplete sequence is held back and prepended to the
    /// next chunk. An invalid sequence anywhere is an error.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, DecodeError> {
        let mut data = std::mem::take(&mut self.carry);
        data.extend_from_slice(chunk);

        let valid_len = match std::str::from_utf8(&data) {
            Ok(_) => data.len(),
            Err(e) => {
                if e.error_len().is_some() {
                    return Err(DecodeError::Invalid);
                }
                // Incomplete sequence at the end of the chunk; hold it back.
                e.valid_up_to()
            }
        };

        self.carry = data.split_off(valid_len);
        String::from_utf8(data).map_err(|_| DecodeError::Invalid)
    }

    /// End of stream: a held-back partial sequence means the body was cut
    /// inside a character.
    pub fn finish(&self) -> Result<(), DecodeError> {
        if self.carry.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Truncated)
        }
    }
}
