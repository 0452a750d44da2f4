//! Background-thread scheduler.
//!
//! One worker per scheduler, spawned on first use. Timers sit in a
//! deadline-ordered map; the worker sleeps on a condvar until the earliest
//! deadline or until a new timer arrives. Tasks run with the queue unlocked.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::{FlushScheduler, FlushTask, ScheduledFlush};
use crate::error::ScheduleError;

type TimerKey = (Instant, u64);

#[derive(Default)]
struct Queue {
    timers: BTreeMap<TimerKey, FlushTask>,
    next_id: u64,
    worker_started: bool,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    queue: Mutex<Queue>,
    wake: Condvar,
}

#[derive(Default)]
pub struct ThreadScheduler {
    shared: Arc<Shared>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().timers.len()
    }

    fn run_worker(shared: Arc<Shared>) {
        let mut queue = shared.queue.lock();
        loop {
            if queue.shutdown {
                return;
            }
            let Some(key) = queue.timers.keys().next().copied() else {
                shared.wake.wait(&mut queue);
                continue;
            };
            if key.0 > Instant::now() {
                let _ = shared.wake.wait_until(&mut queue, key.0);
                continue;
            }
            let Some(task) = queue.timers.remove(&key) else {
                continue;
            };
            drop(queue);
            // A panicking flush must not take the worker down with it.
            let _ = panic::catch_unwind(AssertUnwindSafe(task));
            queue = shared.queue.lock();
        }
    }

    fn cancel(shared: &Weak<Shared>, key: TimerKey) {
        if let Some(shared) = shared.upgrade() {
            shared.queue.lock().timers.remove(&key);
        }
    }
}

impl FlushScheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, task: FlushTask) -> Result<ScheduledFlush, ScheduleError> {
        let mut queue = self.shared.queue.lock();
        if queue.shutdown {
            return Err(ScheduleError::Shutdown);
        }
        if !queue.worker_started {
            let shared = self.shared.clone();
            thread::Builder::new()
                .name("tintlog-flush".to_string())
                .spawn(move || Self::run_worker(shared))?;
            queue.worker_started = true;
        }

        let key = (Instant::now() + delay, queue.next_id);
        queue.next_id += 1;
        queue.timers.insert(key, task);
        drop(queue);
        self.shared.wake.notify_one();

        let shared = Arc::downgrade(&self.shared);
        Ok(ScheduledFlush::new(move || Self::cancel(&shared, key)))
    }
}

impl Drop for ThreadScheduler {
    /// Pending timers are discarded. A logger flushes its own pending
    /// summary when its last handle goes away, before the scheduler does.
    fn drop(&mut self) {
        let mut queue = self.shared.queue.lock();
        queue.shutdown = true;
        queue.timers.clear();
        drop(queue);
        self.shared.wake.notify_all();
    }
}
