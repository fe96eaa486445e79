use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Dispatch tag carried by every inbound envelope.
///
/// `Chunk` carries one unit of result payload, `Error` carries a
/// `{code, message}` pair and `Choke` ends the stream successfully.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum MessageTag {
    Chunk = 0,
    Error = 1,
    Choke = 2,
}

impl MessageTag {
    /// Whether delivering this tag ends the session from the connection's
    /// point of view.
    pub fn is_terminal(self) -> bool {
        matches!(self, MessageTag::Error | MessageTag::Choke)
    }
}
