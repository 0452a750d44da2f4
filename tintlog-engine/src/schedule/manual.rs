//! Scheduler driven by a `VirtualClock`.
//!
//! Nothing fires on its own; `advance` moves the clock forward and runs every
//! timer that came due on the way, in deadline order, with the clock set to
//! each timer's deadline while it runs.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tintlog_core::{Clock, VirtualClock};

use super::{FlushScheduler, FlushTask, ScheduledFlush};
use crate::error::ScheduleError;

type TimerKey = (u64, u64);

#[derive(Default)]
struct Timers {
    due: BTreeMap<TimerKey, FlushTask>,
    next_id: u64,
}

#[derive(Clone)]
pub struct ManualScheduler {
    clock: VirtualClock,
    timers: Arc<Mutex<Timers>>,
}

impl ManualScheduler {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            timers: Arc::new(Mutex::new(Timers::default())),
        }
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn pending(&self) -> usize {
        self.timers.lock().due.len()
    }

    /// Moves the clock forward by `ms`, firing timers as their deadlines pass.
    pub fn advance(&self, ms: u64) {
        let target = self.clock.now_ms().saturating_add(ms);
        while let Some((due_ms, task)) = self.pop_due(target) {
            if due_ms > self.clock.now_ms() {
                self.clock.set(due_ms);
            }
            task();
        }
        self.clock.set(target);
    }

    /// Fires timers already due without moving the clock.
    pub fn run_due(&self) {
        self.advance(0);
    }

    fn pop_due(&self, target: u64) -> Option<(u64, FlushTask)> {
        let mut timers = self.timers.lock();
        let key = timers.due.keys().next().copied()?;
        if key.0 > target {
            return None;
        }
        timers.due.remove(&key).map(|task| (key.0, task))
    }

    fn cancel(timers: &Weak<Mutex<Timers>>, key: TimerKey) {
        if let Some(timers) = timers.upgrade() {
            timers.lock().due.remove(&key);
        }
    }
}

impl FlushScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: FlushTask) -> Result<ScheduledFlush, ScheduleError> {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let mut timers = self.timers.lock();
        let key = (self.clock.now_ms().saturating_add(delay_ms), timers.next_id);
        timers.next_id += 1;
        timers.due.insert(key, task);

        let weak = Arc::downgrade(&self.timers);
        Ok(ScheduledFlush::new(move || Self::cancel(&weak, key)))
    }
}
