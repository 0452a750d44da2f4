//! Scheduler backed by a tokio runtime. Each timer is a sleeping task;
//! cancelling aborts it.

use std::time::Duration;

use tokio::runtime::Handle;

use super::{FlushScheduler, FlushTask, ScheduledFlush};
use crate::error::ScheduleError;

#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime the caller is running on.
    pub fn current() -> Result<Self, ScheduleError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|err| ScheduleError::NoRuntime(err.to_string()))
    }
}

impl FlushScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: FlushTask) -> Result<ScheduledFlush, ScheduleError> {
        let timer = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        Ok(ScheduledFlush::new(move || timer.abort()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_once_the_delay_passes() {
        let scheduler = TokioScheduler::current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        scheduler
            .schedule(
                Duration::from_millis(1_000),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_timers_stay_quiet() {
        let scheduler = TokioScheduler::current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut flush = scheduler
            .schedule(
                Duration::from_millis(10),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        flush.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_runtime_is_an_error() {
        assert!(matches!(
            TokioScheduler::current(),
            Err(ScheduleError::NoRuntime(_))
        ));
    }
}
