use std::time::Duration;
use tokio::time::Instant;

/// Single-slot cancellable timer.
///
/// Holds at most one pending value. Scheduling again replaces (cancels) the
/// pending one, which is what debouncing needs: only the latest request in a
/// burst survives to its deadline.
#[derive(Debug, Clone)]
pub struct TimerSlot<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> TimerSlot<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Arm the slot for `now + delay`. Returns the value it displaced.
    pub fn schedule(&mut self, now: Instant, value: T) -> Option<T> {
        self.pending
            .replace((now + self.delay, value))
            .map(|(_, old)| old)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the value if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}
