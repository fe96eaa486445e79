use std::fmt;
use std::time::Duration;

/// A payload could not be decoded into the shape its method declares.
///
/// This indicates a protocol or version mismatch between the peers and is
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFault {
    expected: &'static str,
    reason: String,
}

impl DecodeFault {
    pub fn new(expected: &'static str, reason: impl Into<String>) -> Self {
        Self {
            expected,
            reason: reason.into(),
        }
    }

    /// Name of the type the payload was decoded against.
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for DecodeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode `{}`: {}", self.expected, self.reason)
    }
}

impl std::error::Error for DecodeFault {}

/// Discriminant of a `ServiceError`, for callers that only care about the
/// category of failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ServiceErrorKind {
    Remote,
    Decode,
    Timeout,
    Transport,
}

/// Terminal failure observed by the consumer of an RPC call.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The remote service answered with an error envelope.
    Remote { code: i32, message: String },
    /// A chunk or error payload did not match the expected shape.
    Decode(DecodeFault),
    /// No terminal message arrived before the session's deadline.
    Timeout { after: Duration },
    /// The connection carrying the session was lost.
    Transport(String),
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::Remote { .. } => ServiceErrorKind::Remote,
            ServiceError::Decode(_) => ServiceErrorKind::Decode,
            ServiceError::Timeout { .. } => ServiceErrorKind::Timeout,
            ServiceError::Transport(_) => ServiceErrorKind::Transport,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Remote { code, message } => {
                write!(f, "remote service error {}: {}", code, message)
            }
            ServiceError::Decode(fault) => write!(f, "decode fault: {}", fault),
            ServiceError::Timeout { after } => write!(f, "call timed out after {:?}", after),
            ServiceError::Transport(reason) => write!(f, "transport error: {}", reason),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Decode(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<DecodeFault> for ServiceError {
    fn from(fault: DecodeFault) -> Self {
        ServiceError::Decode(fault)
    }
}
