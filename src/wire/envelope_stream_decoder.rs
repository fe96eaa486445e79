use crate::constants::{ENVELOPE_HEADER_SIZE, ENVELOPE_LENGTH_FIELD_SIZE, MAX_FRAME_PAYLOAD_SIZE};
use crate::wire::{Envelope, EnvelopeCodec, FrameDecodeError};
use std::collections::VecDeque;

/// Incremental decoder turning an arbitrary split of inbound bytes into
/// envelopes.
///
/// Partial frames are buffered until the rest of their bytes arrive. A frame
/// with an unknown tag is skipped on its own; an oversized length prefix
/// poisons everything buffered so far, since the frame boundary is lost.
pub struct EnvelopeStreamDecoder {
    buffer: Vec<u8>, // Holds partial frame data
}

pub struct EnvelopeDecoderIterator {
    queue: VecDeque<Result<Envelope, FrameDecodeError>>,
}

impl Iterator for EnvelopeDecoderIterator {
    type Item = Result<Envelope, FrameDecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}

impl Default for EnvelopeStreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeStreamDecoder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Number of bytes waiting for the remainder of their frame.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn read_bytes(&mut self, data: &[u8]) -> EnvelopeDecoderIterator {
        self.buffer.extend_from_slice(data);
        let mut queue = VecDeque::new();

        while self.buffer.len() >= ENVELOPE_LENGTH_FIELD_SIZE {
            let len = match EnvelopeCodec::peek_payload_len(&self.buffer) {
                Some(len) => len,
                None => {
                    queue.push_back(Err(FrameDecodeError::IncompleteHeader));
                    break;
                }
            };

            if len > MAX_FRAME_PAYLOAD_SIZE {
                tracing::warn!(len, "discarding inbound buffer after oversized frame");
                self.buffer.clear();
                queue.push_back(Err(FrameDecodeError::PayloadTooLarge(len)));
                break;
            }

            let total = ENVELOPE_HEADER_SIZE + len;

            if self.buffer.len() < total {
                break;
            }

            let result = EnvelopeCodec::decode(&self.buffer[..total]);
            self.buffer.drain(..total);
            queue.push_back(result);
        }

        EnvelopeDecoderIterator { queue }
    }
}
