use std::time::Duration;

pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// A one-shot timer driven by whatever reactor hosts the connection.
pub trait Timer: Send {
    /// Schedules `on_expire` to run once, `after` from now. Any pending
    /// expiry is replaced.
    fn arm(&mut self, after: Duration, on_expire: TimerCallback);

    /// Cancels the pending expiry, if any. Idempotent.
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;
}

pub trait TimerFactory: Send + Sync {
    fn create_timer(&self) -> Box<dyn Timer>;
}
