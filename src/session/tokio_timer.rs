use crate::session::{Timer, TimerCallback, TimerFactory};
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

/// Creates timers that sleep on a Tokio runtime.
#[derive(Clone)]
pub struct TokioTimerFactory {
    handle: Handle,
}

impl TokioTimerFactory {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Binds to the runtime the caller is running on.
    pub fn try_current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl TimerFactory for TokioTimerFactory {
    fn create_timer(&self) -> Box<dyn Timer> {
        Box::new(TokioTimer {
            handle: self.handle.clone(),
            task: None,
        })
    }
}

/// One-shot timer backed by a spawned `tokio::time::sleep`.
///
/// Disarming aborts the sleeping task; a callback that has already started
/// running is not interrupted.
pub struct TokioTimer {
    handle: Handle,
    task: Option<JoinHandle<()>>,
}

impl Timer for TokioTimer {
    fn arm(&mut self, after: Duration, on_expire: TimerCallback) {
        self.disarm();

        self.task = Some(self.handle.spawn(async move {
            tokio::time::sleep(after).await;
            on_expire();
        }));
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
