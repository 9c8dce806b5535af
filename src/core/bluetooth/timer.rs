//! One-shot cancellable deferred task, driven by the tokio clock.

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Runs a callback once at `deadline` unless cancelled first.
pub struct DeadlineTimer {
    cancel_token: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl DeadlineTimer {
    /// Schedules `on_fire` for `deadline`. Must be called from within a tokio runtime.
    pub fn schedule<F>(deadline: Instant, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let cancel_token_for_task = cancel_token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                // cancellation wins if both are ready
                biased;
                _ = cancel_token_for_task.cancelled() => {
                    debug!("Deadline timer cancelled before firing.");
                }
                _ = sleep_until(deadline) => {
                    on_fire();
                }
            }
        });

        Self {
            cancel_token,
            task_handle: Some(handle),
        }
    }

    /// Cancels the timer. Safe to call after it fired or was already cancelled.
    pub fn cancel(&mut self) {
        self.cancel_token.cancel();
        self.task_handle.take();
    }

    /// True while the callback has neither run nor been cancelled.
    pub fn is_pending(&self) -> bool {
        match &self.task_handle {
            Some(handle) => !handle.is_finished() && !self.cancel_token.is_cancelled(),
            None => false,
        }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_at_deadline() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_for_timer = fired.clone();
        let timer = DeadlineTimer::schedule(Instant::now() + Duration::from_secs(10), move || {
            fired_for_timer.fetch_add(1, Ordering::SeqCst);
        });

        sleep_until(Instant::now() + Duration::from_secs(9)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_for_timer = fired.clone();
        let mut timer = DeadlineTimer::schedule(Instant::now() + Duration::from_secs(10), move || {
            fired_for_timer.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(2)).await;
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_pending());

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_for_timer = fired.clone();
        let timer = DeadlineTimer::schedule(Instant::now() + Duration::from_secs(1), move || {
            fired_for_timer.fetch_add(1, Ordering::SeqCst);
        });
        drop(timer);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
