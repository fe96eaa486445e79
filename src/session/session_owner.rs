use crate::session::TimerFactory;
use crate::wire::SessionId;
use std::sync::Arc;

/// The connection side of a session's back-reference.
pub trait SessionOwner: Send + Sync {
    /// Source of the timers sessions arm for their deadlines.
    fn timer_factory(&self) -> Arc<dyn TimerFactory>;

    /// Notification that a session stopped on its own (its deadline fired).
    ///
    /// Called from inside a timer callback; implementations must only record
    /// the ID and defer any session-table mutation.
    fn on_session_stopped(&self, id: SessionId);
}
