use callmux::constants::DEFAULT_CALL_TIMEOUT;
use std::time::Duration;

/// Per-call settings.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Deadline after which the call fails with a timeout. `None` waits
    /// indefinitely.
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_default_timeout(self) -> Self {
        self.with_timeout(DEFAULT_CALL_TIMEOUT)
    }
}
