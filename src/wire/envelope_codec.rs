use crate::{
    constants::{
        ENVELOPE_HEADER_SIZE, ENVELOPE_LENGTH_FIELD_SIZE, ENVELOPE_SESSION_ID_OFFSET,
        ENVELOPE_TAG_OFFSET, MAX_FRAME_PAYLOAD_SIZE,
    },
    wire::{Envelope, FrameDecodeError, MessageTag},
};

/// Encodes and decodes single inbound envelope frames.
///
/// Layout (little-endian):
///
/// ```text
/// [payload_len: u32][session_id: u64][tag: u8][payload ...]
/// ```
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    pub fn encode(envelope: &Envelope) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ENVELOPE_HEADER_SIZE + envelope.payload.len());

        buf.extend(&(envelope.payload.len() as u32).to_le_bytes());
        buf.extend(&envelope.session_id.to_le_bytes());
        buf.push(envelope.tag.into());
        buf.extend(&envelope.payload);

        buf
    }

    /// Reads the declared payload length from the start of `buf`.
    pub fn peek_payload_len(buf: &[u8]) -> Option<usize> {
        buf.get(..ENVELOPE_LENGTH_FIELD_SIZE)
            .and_then(|bytes| bytes.try_into().ok())
            .map(u32::from_le_bytes)
            .map(|len| len as usize)
    }

    /// Decodes one complete frame from the start of `buf`.
    ///
    /// Bytes past the end of the declared payload are ignored.
    pub fn decode(buf: &[u8]) -> Result<Envelope, FrameDecodeError> {
        let len = Self::peek_payload_len(buf).ok_or(FrameDecodeError::IncompleteHeader)?;

        if len > MAX_FRAME_PAYLOAD_SIZE {
            return Err(FrameDecodeError::PayloadTooLarge(len));
        }

        if buf.len() < ENVELOPE_HEADER_SIZE + len {
            return Err(FrameDecodeError::IncompleteHeader);
        }

        let session_id = buf[ENVELOPE_SESSION_ID_OFFSET..ENVELOPE_TAG_OFFSET]
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| FrameDecodeError::IncompleteHeader)?;

        let raw_tag = buf[ENVELOPE_TAG_OFFSET];
        let tag =
            MessageTag::try_from(raw_tag).map_err(|_| FrameDecodeError::UnknownTag(raw_tag))?;

        let payload = buf[ENVELOPE_HEADER_SIZE..ENVELOPE_HEADER_SIZE + len].to_vec();

        Ok(Envelope {
            session_id,
            tag,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_short_buffers() {
        let encoded = EnvelopeCodec::encode(&Envelope::chunk(9, b"abc".to_vec()));

        assert_eq!(
            EnvelopeCodec::decode(&encoded[..ENVELOPE_HEADER_SIZE]),
            Err(FrameDecodeError::IncompleteHeader)
        );
        assert_eq!(
            EnvelopeCodec::decode(&encoded[..2]),
            Err(FrameDecodeError::IncompleteHeader)
        );
    }

    #[test]
    fn decode_reports_unknown_tag() {
        let mut encoded = EnvelopeCodec::encode(&Envelope::choke(1));
        encoded[ENVELOPE_TAG_OFFSET] = 0x7f;

        assert_eq!(
            EnvelopeCodec::decode(&encoded),
            Err(FrameDecodeError::UnknownTag(0x7f))
        );
    }
}
