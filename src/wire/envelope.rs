use crate::error::DecodeFault;
use crate::wire::MessageTag;

/// Identifies one outstanding call on a connection.
pub type SessionId = u64;

/// A single received wire unit addressed to a session.
///
/// Envelopes are produced by the framing layer and only borrowed while they
/// are routed to their session's handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub session_id: SessionId,
    pub tag: MessageTag,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(session_id: SessionId, tag: MessageTag, payload: Vec<u8>) -> Self {
        Self {
            session_id,
            tag,
            payload,
        }
    }

    /// A chunk carrying already-encoded result bytes.
    pub fn chunk(session_id: SessionId, payload: Vec<u8>) -> Self {
        Self::new(session_id, MessageTag::Chunk, payload)
    }

    /// A chunk carrying the `bitcode` encoding of `value`.
    pub fn encode_chunk<T>(session_id: SessionId, value: &T) -> Self
    where
        T: bitcode::Encode + ?Sized,
    {
        Self::chunk(session_id, bitcode::encode(value))
    }

    /// An error envelope carrying `{code, message}`.
    pub fn error(session_id: SessionId, code: i32, message: &str) -> Self {
        let payload = bitcode::encode(&(code, message.to_string()));
        Self::new(session_id, MessageTag::Error, payload)
    }

    /// Graceful end of the result stream.
    pub fn choke(session_id: SessionId) -> Self {
        Self::new(session_id, MessageTag::Choke, Vec::new())
    }

    /// Decodes the `{code, message}` pair of an `Error` envelope.
    pub fn decode_error_payload(&self) -> Result<(i32, String), DecodeFault> {
        bitcode::decode::<(i32, String)>(&self.payload)
            .map_err(|e| DecodeFault::new("(i32, String)", e.to_string()))
    }
}
