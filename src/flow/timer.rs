//! Cancelable delayed callbacks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

/// A callback that runs once after a delay unless cancelled first.
///
/// Firing and cancelling race on a single flag, so exactly one of them takes
/// effect. Dropping the task cancels it.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct ScheduledTask {
    settled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Runs `callback` on the runtime after `delay`.
    pub fn schedule<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let settled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&settled);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.swap(true, Ordering::AcqRel) {
                callback();
            }
        });

        Self { settled, handle }
    }

    /// Prevents the callback from starting.
    ///
    /// Returns `true` if this call won, `false` if the callback already ran
    /// or the task was already cancelled.
    pub fn cancel(&self) -> bool {
        let won = !self.settled.swap(true, Ordering::AcqRel);
        if won {
            self.handle.abort();
        }
        won
    }

    /// Whether the task has fired or been cancelled.
    pub fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_task(delay_ms: u64) -> (ScheduledTask, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        let task = ScheduledTask::schedule(Duration::from_millis(delay_ms), move || {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        (task, count)
    }

    async fn wait_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_delay() {
        let (task, count) = counting_task(3500);

        wait_ms(3400).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!task.is_settled());

        wait_ms(200).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(task.is_settled());

        wait_ms(10_000).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_fire_wins() {
        let (task, count) = counting_task(100);

        assert!(task.cancel());
        wait_ms(500).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!task.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_loses() {
        let (task, count) = counting_task(100);

        wait_ms(200).await;

        assert!(!task.cancel());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (task, count) = counting_task(100);

        drop(task);
        wait_ms(500).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
