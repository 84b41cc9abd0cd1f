//! Single-slot cancellable timer.
//!
//! A [`DebounceTimer`] holds at most one pending callback. Scheduling again
//! replaces the pending callback instead of queueing a second one, which is
//! exactly a trailing-edge debounce when every trigger calls
//! [`DebounceTimer::schedule`]. Cancelling (or dropping) the timer guarantees
//! the pending callback never observes a current epoch.
//!
//! Owners keep the timer inside their own lock and pass a callback that
//! re-acquires that lock and calls [`DebounceTimer::settle`] with the epoch it
//! was given. `settle` returns `false` for anything that was replaced or
//! cancelled in the meantime, which closes the race between `abort()` and a
//! task that already woke up.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Identifies one scheduling of a [`DebounceTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEpoch(u64);

pub struct DebounceTimer {
    window: Duration,
    runtime: Handle,
    epoch: u64,
    pending: Option<JoinHandle<()>>,
}

impl fmt::Debug for DebounceTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceTimer")
            .field("window", &self.window)
            .field("epoch", &self.epoch)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl DebounceTimer {
    pub fn new(window: Duration, runtime: Handle) -> Self {
        Self {
            window,
            runtime,
            epoch: 0,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arm the timer, replacing anything already pending.
    ///
    /// `on_fire` runs on the runtime once the window elapses, unless the
    /// timer is rescheduled or cancelled first.
    pub fn schedule<F>(&mut self, on_fire: F) -> TimerEpoch
    where
        F: FnOnce(TimerEpoch) + Send + 'static,
    {
        self.cancel();
        let epoch = TimerEpoch(self.epoch);
        let window = self.window;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            on_fire(epoch);
        }));
        epoch
    }

    /// Drop the pending callback, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.epoch = self.epoch.wrapping_add(1);
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Called from the fired callback. Returns `true` when `epoch` is still
    /// the live scheduling, clearing the slot; `false` for stale fires.
    pub fn settle(&mut self, epoch: TimerEpoch) -> bool {
        if self.epoch != epoch.0 || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    fn shared_timer(window_ms: u64) -> Arc<Mutex<DebounceTimer>> {
        Arc::new(Mutex::new(DebounceTimer::new(
            Duration::from_millis(window_ms),
            Handle::current(),
        )))
    }

    fn arm(
        timer: &Arc<Mutex<DebounceTimer>>,
        fired: &Arc<AtomicUsize>,
    ) -> TimerEpoch {
        let owner = Arc::clone(timer);
        let fired = Arc::clone(fired);
        timer.lock().schedule(move |epoch| {
            if owner.lock().settle(epoch) {
                fired.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_window() {
        let timer = shared_timer(100);
        let fired = Arc::new(AtomicUsize::new(0));
        arm(&timer, &fired);

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.lock().is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.lock().is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_pending_fire() {
        let timer = shared_timer(100);
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            arm(&timer, &fired);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_fire() {
        let timer = shared_timer(100);
        let fired = Arc::new(AtomicUsize::new(0));
        arm(&timer, &fired);

        assert!(timer.lock().cancel());
        assert!(!timer.lock().cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_epoch_does_not_settle() {
        let timer = shared_timer(100);
        let fired = Arc::new(AtomicUsize::new(0));
        let first = arm(&timer, &fired);
        let second = arm(&timer, &fired);

        let mut guard = timer.lock();
        assert!(!guard.settle(first));
        assert!(guard.settle(second));
        assert!(!guard.settle(second));
    }
}
