//! Poll-driven timers for the page refresh loop. Time is always an
//! `Instant` handed in by the caller, so the event loop drives real time
//! and tests drive synthetic time.

use std::time::{Duration, Instant};

use tracing::debug;

/// Repeating page-refresh timer. Idle until `start`, Idle again after
/// `stop`; once stopped, `poll` never reports a tick until restarted.
#[derive(Debug)]
pub struct RefreshScheduler {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Begin ticking. Calling `start` while already running restarts the
    /// interval from `now`.
    pub fn start(&mut self, now: Instant) {
        debug!(interval_ms = self.interval.as_millis() as u64, "scheduler started");
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            debug!("scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a tick is due. Reports at most one tick per call and
    /// re-arms from `now`, so a stalled caller never sees a backlog burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// One-shot deferred action. Fires exactly once; spent or canceled
/// one-shots never fire again.
#[derive(Debug, Default)]
pub struct OneShot {
    due: Option<Instant>,
}

impl OneShot {
    pub fn idle() -> Self {
        Self { due: None }
    }

    pub fn after(now: Instant, delay: Duration) -> Self {
        Self {
            due: Some(now + delay),
        }
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// True exactly once, at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
