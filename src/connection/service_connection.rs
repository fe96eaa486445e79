use crate::constants::FIRST_SESSION_ID;
use crate::error::ServiceError;
use crate::session::{Session, SessionOwner, TimerFactory};
use crate::wire::{
    Envelope, EnvelopeStreamDecoder, FrameDecodeError, Invocation, InvocationCodec, SessionId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub type EmitFn = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// Session table and message router for one transport connection.
///
/// The socket itself lives elsewhere: inbound bytes are fed to `read_bytes`
/// and outbound frames leave through the `emit` function. Sessions are
/// removed here, and only here, after a terminal delivery, a transport
/// failure, or once they report that their deadline fired.
pub struct ServiceConnection {
    next_session_id: AtomicU64,
    sessions: Mutex<HashMap<SessionId, Session>>,
    // Sessions that stopped inside a timer callback, awaiting removal.
    stopped_sessions: Mutex<Vec<SessionId>>,
    decoder: Mutex<EnvelopeStreamDecoder>,
    timers: Arc<dyn TimerFactory>,
    emit: EmitFn,
}

impl ServiceConnection {
    pub fn new<E>(emit: E, timers: Arc<dyn TimerFactory>) -> Arc<Self>
    where
        E: Fn(Vec<u8>) + Send + Sync + 'static,
    {
        Arc::new(Self {
            next_session_id: AtomicU64::new(FIRST_SESSION_ID),
            sessions: Mutex::new(HashMap::new()),
            stopped_sessions: Mutex::new(Vec::new()),
            decoder: Mutex::new(EnvelopeStreamDecoder::new()),
            timers,
            emit: Arc::new(emit),
        })
    }

    /// Returns an ID not used by any currently open session.
    pub fn allocate_session_id(&self) -> SessionId {
        loop {
            let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
            if id != 0 && !self.lock_sessions().contains_key(&id) {
                return id;
            }
        }
    }

    /// Adds a session to the table, returning any session it displaced.
    pub fn register(&self, session: Session) -> Option<Session> {
        self.reap_stopped();

        let id = session.id();
        let displaced = self.lock_sessions().insert(id, session);

        if displaced.is_some() {
            tracing::warn!(session_id = id, "session ID reused while still open");
        }

        displaced
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.reap_stopped();
        self.lock_sessions().contains_key(&id)
    }

    /// Runs `f` against the session registered under `id`, if any.
    ///
    /// A session stopped inside `f` stays in the table until the next reap.
    pub fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.reap_stopped();
        self.lock_sessions().get_mut(&id).map(f)
    }

    /// Arms (or with a zero duration, clears) the deadline of an open session.
    pub fn set_timeout(&self, id: SessionId, timeout: Duration) -> bool {
        self.with_session(id, |session| session.set_timeout(timeout)).is_some()
    }

    pub fn remove(&self, id: SessionId) -> Option<Session> {
        self.lock_sessions().remove(&id)
    }

    pub fn session_count(&self) -> usize {
        self.reap_stopped();
        self.lock_sessions().len()
    }

    /// Routes one envelope to its session.
    ///
    /// The session is removed once the delivery leaves its handler terminal.
    /// Returns `false` if no open session matched.
    pub fn dispatch(&self, envelope: &Envelope) -> bool {
        self.reap_stopped();

        let finished = {
            let mut sessions = self.lock_sessions();

            let Some(session) = sessions.get(&envelope.session_id) else {
                tracing::debug!(
                    session_id = envelope.session_id,
                    tag = ?envelope.tag,
                    "dropping envelope for unknown session"
                );
                return false;
            };

            session.handle_message(envelope);

            if envelope.tag.is_terminal() || session.is_terminated() {
                sessions.remove(&envelope.session_id)
            } else {
                None
            }
        };

        if let Some(session) = finished {
            tracing::trace!(session_id = session.id(), "session finished");
        }

        true
    }

    /// Frames inbound bytes into envelopes and dispatches each one.
    ///
    /// Every well-formed envelope is dispatched even if some frames are
    /// malformed; the first framing error is returned afterwards.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<usize, FrameDecodeError> {
        let results: Vec<_> = self.lock_decoder().read_bytes(bytes).collect();

        let mut first_error = None;
        let mut delivered = 0;

        for result in results {
            match result {
                Ok(envelope) => {
                    if self.dispatch(&envelope) {
                        delivered += 1;
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed inbound frame");
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(delivered),
        }
    }

    /// Transport-failure entry point: fails every open session with `error`
    /// and clears the table. Returns how many sessions were failed.
    pub fn fail_all(&self, error: ServiceError) -> usize {
        let drained: Vec<Session> = self
            .lock_sessions()
            .drain()
            .map(|(_, session)| session)
            .collect();

        self.lock_stopped_sessions().clear();

        if !drained.is_empty() {
            tracing::warn!(sessions = drained.len(), %error, "failing all open sessions");
        }

        for session in &drained {
            session.error(error.clone());
        }

        drained.len()
    }

    /// Removes sessions that stopped through their deadline.
    pub fn reap_stopped(&self) -> usize {
        let stopped = std::mem::take(&mut *self.lock_stopped_sessions());
        if stopped.is_empty() {
            return 0;
        }

        let removed: Vec<Session> = {
            let mut sessions = self.lock_sessions();
            stopped
                .iter()
                .filter_map(|id| sessions.remove(id))
                .collect()
        };

        tracing::trace!(sessions = removed.len(), "reaped stopped sessions");
        removed.len()
    }

    /// Encodes an invocation frame and hands it to the transport.
    pub fn send_invocation(&self, invocation: &Invocation) {
        (self.emit)(InvocationCodec::encode(invocation));
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_stopped_sessions(&self) -> MutexGuard<'_, Vec<SessionId>> {
        self.stopped_sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_decoder(&self) -> MutexGuard<'_, EnvelopeStreamDecoder> {
        self.decoder.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionOwner for ServiceConnection {
    fn timer_factory(&self) -> Arc<dyn TimerFactory> {
        self.timers.clone()
    }

    fn on_session_stopped(&self, id: SessionId) {
        self.lock_stopped_sessions().push(id);
    }
}

impl Drop for ServiceConnection {
    fn drop(&mut self) {
        self.fail_all(ServiceError::Transport("connection dropped".into()));
    }
}
