//! ## tintlog-core::time
//! **Wall and virtual clocks**
//!
//! The throttle window and timer fields only ever need "milliseconds since
//! some epoch", so both clocks speak `u64` milliseconds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the Unix epoch, from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A manually driven clock. Clones share the same counter.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    #[inline]
    pub fn advance(&self, ms: u64) {
        self.offset.fetch_add(ms, Ordering::Release);
    }

    #[inline]
    pub fn set(&self, ms: u64) {
        self.offset.store(ms, Ordering::Release);
    }
}

impl Clock for VirtualClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_clock_advances() {
        let clock = VirtualClock::new(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 350);
    }

    #[test]
    fn clones_share_time() {
        let clock = VirtualClock::new(0);
        let other = clock.clone();
        other.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
