use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameDecodeError {
    /// Not enough bytes to hold the fixed-size header and declared payload.
    IncompleteHeader,

    /// The tag byte does not map to a known `MessageTag`.
    UnknownTag(u8),

    /// The length prefix exceeds `MAX_FRAME_PAYLOAD_SIZE`.
    PayloadTooLarge(usize),
}

impl fmt::Display for FrameDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDecodeError::IncompleteHeader => write!(f, "incomplete frame header"),
            FrameDecodeError::UnknownTag(tag) => write!(f, "unknown message tag: {}", tag),
            FrameDecodeError::PayloadTooLarge(len) => {
                write!(f, "frame payload of {} bytes exceeds limit", len)
            }
        }
    }
}

impl std::error::Error for FrameDecodeError {}
