//! Deferred flush timers.
//!
//! A logger arms at most one timer at a time and cancels it on every passing
//! call. Cancelling is idempotent, and a timer that already started running
//! when it was cancelled is expected to notice on its own (the logger checks a
//! generation counter).

mod manual;
mod runtime;
mod thread;

use std::fmt;
use std::time::Duration;

use crate::error::ScheduleError;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;
pub use thread::ThreadScheduler;

/// Work run once the delay elapses.
pub type FlushTask = Box<dyn FnOnce() + Send + 'static>;

pub trait FlushScheduler: Send + Sync {
    /// Runs `task` once after `delay`, unless cancelled first.
    fn schedule(&self, delay: Duration, task: FlushTask) -> Result<ScheduledFlush, ScheduleError>;
}

/// Handle to an armed timer.
///
/// Dropping the handle does not cancel the timer.
pub struct ScheduledFlush {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduledFlush {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Removes the timer. Later calls do nothing.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }
}

impl fmt::Debug for ScheduledFlush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledFlush")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
