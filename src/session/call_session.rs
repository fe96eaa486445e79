use crate::error::ServiceError;
use crate::session::{ServiceHandler, SessionOwner, Timer, TimerFactory};
use crate::wire::{Envelope, SessionId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// State shared between a session and its pending timer callback.
struct SessionCore {
    handler: Box<dyn ServiceHandler>,
    stopped: bool,
    // Bumped on every arm/disarm; a callback only acts if its epoch is current.
    timer_epoch: u64,
}

/// One outstanding RPC call.
///
/// A session owns the call's handler and an optional deadline. It moves from
/// active to stopped exactly once (on timeout or explicit `stop`) and never
/// back; once stopped, neither messages nor timer callbacks reach the
/// handler.
///
/// Removing the session from the connection's table is the connection's job.
/// When the deadline fires, the session fails the handler and then only
/// notifies the connection through `SessionOwner::on_session_stopped`.
pub struct Session {
    id: SessionId,
    core: Arc<Mutex<SessionCore>>,
    timer: Option<Box<dyn Timer>>,
    timers: Arc<dyn TimerFactory>,
    connection: Weak<dyn SessionOwner>,
}

impl Session {
    pub fn new<O>(connection: &Arc<O>, id: SessionId, handler: Box<dyn ServiceHandler>) -> Self
    where
        O: SessionOwner + 'static,
    {
        let timers = connection.timer_factory();
        let connection: Weak<O> = Arc::downgrade(connection);
        let connection: Weak<dyn SessionOwner> = connection;

        Self {
            id,
            core: Arc::new(Mutex::new(SessionCore {
                handler,
                stopped: false,
                timer_epoch: 0,
            })),
            timer: None,
            timers,
            connection,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Arms the session deadline, replacing any deadline already armed.
    ///
    /// A zero duration means "no timeout" and only disarms.
    pub fn set_timeout(&mut self, timeout: Duration) {
        if timeout.is_zero() {
            self.stop_timer();
            return;
        }

        let epoch = {
            let mut core = lock_core(&self.core);
            if core.stopped {
                tracing::trace!(session_id = self.id, "ignoring timeout on stopped session");
                return;
            }
            core.timer_epoch += 1;
            core.timer_epoch
        };

        let timer = self.timer.get_or_insert_with(|| self.timers.create_timer());
        timer.disarm();

        let id = self.id;
        let core = Arc::downgrade(&self.core);
        let connection = self.connection.clone();

        timer.arm(
            timeout,
            Box::new(move || Session::on_timeout(id, core, connection, epoch, timeout)),
        );
    }

    /// Disarms any pending deadline. Idempotent.
    pub fn stop_timer(&mut self) {
        lock_core(&self.core).timer_epoch += 1;

        if let Some(timer) = self.timer.as_mut() {
            timer.disarm();
        }
    }

    /// Cancels the session: disarms the deadline and marks it stopped
    /// without notifying the handler. The connection is told so it can
    /// remove the session.
    pub fn stop(&mut self) {
        self.stop_timer();

        let was_stopped = std::mem::replace(&mut lock_core(&self.core).stopped, true);
        if was_stopped {
            return;
        }

        if let Some(connection) = self.connection.upgrade() {
            connection.on_session_stopped(self.id);
        }
    }

    pub fn handle_message(&self, envelope: &Envelope) {
        let mut core = lock_core(&self.core);

        if core.stopped {
            tracing::trace!(
                session_id = self.id,
                tag = ?envelope.tag,
                "dropping message for stopped session"
            );
            return;
        }

        core.handler.handle_message(envelope);
    }

    pub fn error(&self, error: ServiceError) {
        let mut core = lock_core(&self.core);

        if core.stopped {
            tracing::trace!(session_id = self.id, %error, "dropping error for stopped session");
            return;
        }

        core.handler.error(error);
    }

    pub fn is_stopped(&self) -> bool {
        lock_core(&self.core).stopped
    }

    /// Whether the handler's result channel has reached a terminal state.
    pub fn is_terminated(&self) -> bool {
        lock_core(&self.core).handler.is_terminated()
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| timer.is_armed())
    }

    fn on_timeout(
        id: SessionId,
        core: Weak<Mutex<SessionCore>>,
        connection: Weak<dyn SessionOwner>,
        epoch: u64,
        after: Duration,
    ) {
        let Some(core) = core.upgrade() else {
            return;
        };

        {
            let mut core = lock_core(&core);

            if core.stopped || core.timer_epoch != epoch {
                tracing::trace!(session_id = id, "ignoring stale timeout");
                return;
            }

            core.stopped = true;
            tracing::debug!(session_id = id, ?after, "session timed out");
            core.handler.error(ServiceError::Timeout { after });
        }

        if let Some(connection) = connection.upgrade() {
            connection.on_session_stopped(id);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

fn lock_core(core: &Mutex<SessionCore>) -> MutexGuard<'_, SessionCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}
