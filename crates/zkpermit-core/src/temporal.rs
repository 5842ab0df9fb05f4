//! # Clock
//!
//! Permit deadlines are unix seconds. The state machine reads "now" through
//! the [`Clock`] trait so ledgers can supply block time and tests can pin it.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync {
    /// Current unix time, in seconds.
    fn now_secs(&self) -> u64;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        // Pre-epoch system time clamps to zero.
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A manually driven clock, shared by reference.
#[derive(Debug, Default)]
pub struct FixedClock {
    secs: AtomicU64,
}

impl FixedClock {
    /// Start the clock at `secs`.
    pub fn new(secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(secs),
        }
    }

    /// Jump to `secs`.
    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    /// Move forward by `delta` seconds.
    pub fn advance(&self, delta: u64) {
        self.secs.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_secs() > 1_577_836_800);
    }

    #[test]
    fn fixed_clock_set_and_advance() {
        let clock = FixedClock::new(1_000);
        assert_eq!(clock.now_secs(), 1_000);
        clock.advance(5);
        assert_eq!(clock.now_secs(), 1_005);
        clock.set(10);
        assert_eq!(clock.now_secs(), 10);
    }

    #[test]
    fn shared_clock_observes_updates() {
        let clock = Arc::new(FixedClock::new(1));
        let shared = Arc::clone(&clock);
        clock.set(99);
        assert_eq!(shared.now_secs(), 99);
    }
}
