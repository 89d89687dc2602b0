//! Trailing-edge debouncer.
//!
//! Every [`Debouncer::trigger`] cancels the scheduled run and schedules a new
//! one `delay` later, so a burst of triggers produces exactly one run, after
//! the burst has been quiet for `delay`. The action never runs concurrently
//! with the bookkeeping lock held.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::MaestroResult;

type Action = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Schedule {
    /// Bumped on every trigger
    generation: AtomicU64,
    /// Latest generation that fired or was cancelled
    settled: AtomicU64,
    /// Timer task for the latest generation
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Schedule {
    /// Claim the right to fire for `generation`.
    ///
    /// Fails when a newer trigger superseded it.
    fn claim(&self, generation: u64) -> bool {
        let _task = self.task.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        self.settled.store(generation, Ordering::SeqCst);
        true
    }

    fn is_pending(&self) -> bool {
        self.settled.load(Ordering::SeqCst) < self.generation.load(Ordering::SeqCst)
    }

    /// Abort the timer and start a generation that no timer can claim.
    ///
    /// Returns whether a run was pending. A timer that already woke but has
    /// not claimed yet loses its claim.
    fn supersede(&self) -> bool {
        let mut task = self.task.lock();
        if let Some(previous) = task.take() {
            previous.abort();
        }
        let was_pending = self.is_pending();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.settled.store(generation, Ordering::SeqCst);
        was_pending
    }
}

/// Delay-and-coalesce scheduler for a single action.
pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    action: Action,
    schedule: Arc<Schedule>,
}

impl Debouncer {
    /// Create a debouncer on the current tokio runtime.
    pub fn new(delay: Duration, action: impl Fn() + Send + Sync + 'static) -> MaestroResult<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_handle(runtime, delay, action))
    }

    /// Create a debouncer that schedules on `runtime`.
    pub fn with_handle(
        runtime: Handle,
        delay: Duration,
        action: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            delay,
            runtime,
            action: Arc::new(action),
            schedule: Arc::new(Schedule::default()),
        }
    }

    /// The quiet period before the action runs.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the action, replacing any run that has not fired yet.
    pub fn trigger(&self) {
        let mut task = self.schedule.task.lock();
        if let Some(previous) = task.take() {
            previous.abort();
        }

        let generation = self.schedule.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let schedule = Arc::clone(&self.schedule);
        let action = Arc::clone(&self.action);
        let delay = self.delay;

        *task = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if schedule.claim(generation) {
                action();
            }
        }));
    }

    /// Drop the scheduled run, if any.
    pub fn cancel(&self) {
        self.schedule.supersede();
    }

    /// Run the action now if a run is scheduled, cancelling the timer.
    ///
    /// Returns whether the action ran. The scheduled run and the flush never
    /// both fire.
    pub fn flush(&self) -> bool {
        if !self.schedule.supersede() {
            return false;
        }
        (self.action)();
        true
    }

    /// Whether a run is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.schedule.is_pending()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(task) = self.schedule.task.lock().take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting(delay_ms: u64) -> (Debouncer, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        (debouncer, count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_trigger_fires_once_after_delay() {
        let (debouncer, count) = counting(100);

        debouncer.trigger();
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces() {
        let (debouncer, count) = counting(100);

        for _ in 0..10 {
            debouncer.trigger();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        // 500ms of activity, never 100ms quiet
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (debouncer, count) = counting(100);

        debouncer.trigger();
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_runs_now() {
        let (debouncer, count) = counting(100);

        assert!(!debouncer.flush());
        debouncer.trigger();
        assert!(debouncer.flush());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_flush_racing_timer_fires_once() {
        for _ in 0..500 {
            let (debouncer, count) = counting(0);

            debouncer.trigger();
            // let the timer wake on a worker while we flush
            for _ in 0..1_000 {
                std::hint::spin_loop();
            }
            debouncer.flush();

            tokio::time::sleep(Duration::from_millis(2)).await;
            assert_eq!(count.load(Ordering::SeqCst), 1);
            assert!(!debouncer.is_pending());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retrigger_after_fire() {
        let (debouncer, count) = counting(100);

        debouncer.trigger();
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.trigger();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_requires_runtime() {
        let result = Debouncer::new(Duration::from_millis(1), || {});
        assert!(matches!(
            result,
            Err(crate::error::MaestroError::NoRuntime(_))
        ));
    }
}
