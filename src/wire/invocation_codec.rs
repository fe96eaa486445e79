use crate::{
    constants::{
        ENVELOPE_SESSION_ID_OFFSET, INVOCATION_HEADER_SIZE, INVOCATION_METHOD_ID_OFFSET,
        MAX_FRAME_PAYLOAD_SIZE,
    },
    wire::{EnvelopeCodec, FrameDecodeError, SessionId},
};

/// An outbound request opening a session on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub session_id: SessionId,
    pub method_id: u64,
    pub args: Vec<u8>,
}

/// Frames outbound invocations.
///
/// Layout (little-endian):
///
/// ```text
/// [args_len: u32][session_id: u64][method_id: u64][args ...]
/// ```
pub struct InvocationCodec;

impl InvocationCodec {
    pub fn encode(invocation: &Invocation) -> Vec<u8> {
        let mut buf = Vec::with_capacity(INVOCATION_HEADER_SIZE + invocation.args.len());

        buf.extend(&(invocation.args.len() as u32).to_le_bytes());
        buf.extend(&invocation.session_id.to_le_bytes());
        buf.extend(&invocation.method_id.to_le_bytes());
        buf.extend(&invocation.args);

        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Invocation, FrameDecodeError> {
        let len = EnvelopeCodec::peek_payload_len(buf).ok_or(FrameDecodeError::IncompleteHeader)?;

        if len > MAX_FRAME_PAYLOAD_SIZE {
            return Err(FrameDecodeError::PayloadTooLarge(len));
        }

        if buf.len() < INVOCATION_HEADER_SIZE + len {
            return Err(FrameDecodeError::IncompleteHeader);
        }

        let session_id = buf[ENVELOPE_SESSION_ID_OFFSET..INVOCATION_METHOD_ID_OFFSET]
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| FrameDecodeError::IncompleteHeader)?;

        let method_id = buf[INVOCATION_METHOD_ID_OFFSET..INVOCATION_HEADER_SIZE]
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| FrameDecodeError::IncompleteHeader)?;

        Ok(Invocation {
            session_id,
            method_id,
            args: buf[INVOCATION_HEADER_SIZE..INVOCATION_HEADER_SIZE + len].to_vec(),
        })
    }
}
