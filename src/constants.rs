use std::time::Duration;

// Envelope frame related constants
pub const ENVELOPE_LENGTH_FIELD_SIZE: usize = 4;
pub const ENVELOPE_SESSION_ID_OFFSET: usize = 4;
pub const ENVELOPE_TAG_OFFSET: usize = 12;
pub const ENVELOPE_HEADER_SIZE: usize = 13;

/// Byte offset where the 8-byte method ID (u64) of an outbound invocation
/// begins. The length and session ID fields share the envelope layout.
pub const INVOCATION_METHOD_ID_OFFSET: usize = 12;

/// Total size of the fixed-length invocation header (length + session ID +
/// method ID). Does not include the argument bytes.
pub const INVOCATION_HEADER_SIZE: usize = 20;

/// Upper bound on a single frame's declared payload length.
///
/// A length prefix beyond this is treated as stream corruption rather than
/// an allocation request.
pub const MAX_FRAME_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Session IDs handed out by a connection start here; `0` is never issued.
pub const FIRST_SESSION_ID: u64 = 1;

/// Timeout applied by callers that opt into a default deadline.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);
