use crate::error::ServiceError;
use crate::wire::Envelope;

/// Type-erased per-call handler.
///
/// One implementation exists per method descriptor; the session and the
/// connection only ever see it through this trait. Implementations own the
/// single writer of the call's result channel and are therefore not `Clone`.
pub trait ServiceHandler: Send {
    /// Routes one received envelope into the result channel.
    fn handle_message(&mut self, envelope: &Envelope);

    /// Fails the result channel with an error that did not arrive as an
    /// envelope (timeout, transport loss).
    fn error(&mut self, error: ServiceError);

    /// Whether the result channel has reached a terminal state.
    fn is_terminated(&self) -> bool;
}
