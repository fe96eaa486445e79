use crate::session::{Timer, TimerCallback, TimerFactory};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Deterministic clock whose time only moves when `advance` is called.
///
/// Useful for hosts that drive their own reactor and for exercising timeout
/// behavior without sleeping.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ClockState>>,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_slot: u64,
    pending: HashMap<u64, PendingExpiry>,
}

struct PendingExpiry {
    deadline: Duration,
    on_expire: TimerCallback,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Moves time forward and runs every callback whose deadline has been
    /// reached, earliest first. Returns how many fired.
    pub fn advance(&self, by: Duration) -> usize {
        let mut due = {
            let mut state = self.lock();
            state.now += by;
            let now = state.now;

            let slots: Vec<u64> = state
                .pending
                .iter()
                .filter(|(_, expiry)| expiry.deadline <= now)
                .map(|(slot, _)| *slot)
                .collect();

            slots
                .into_iter()
                .filter_map(|slot| state.pending.remove(&slot).map(|expiry| (slot, expiry)))
                .collect::<Vec<_>>()
        };

        due.sort_by_key(|(slot, expiry)| (expiry.deadline, *slot));

        // Callbacks run without the clock lock so they may arm new timers.
        let fired = due.len();
        for (_, expiry) in due {
            (expiry.on_expire)();
        }

        fired
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimerFactory for ManualClock {
    fn create_timer(&self) -> Box<dyn Timer> {
        Box::new(ManualTimer {
            clock: self.clone(),
            slot: None,
        })
    }
}

pub struct ManualTimer {
    clock: ManualClock,
    slot: Option<u64>,
}

impl Timer for ManualTimer {
    fn arm(&mut self, after: Duration, on_expire: TimerCallback) {
        self.disarm();

        let mut state = self.clock.lock();
        let slot = state.next_slot;
        state.next_slot += 1;

        let deadline = state.now + after;
        state.pending.insert(
            slot,
            PendingExpiry {
                deadline,
                on_expire,
            },
        );

        self.slot = Some(slot);
    }

    fn disarm(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.clock.lock().pending.remove(&slot);
        }
    }

    fn is_armed(&self) -> bool {
        self.slot
            .is_some_and(|slot| self.clock.lock().pending.contains_key(&slot))
    }
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
