//! Main-thread callback queue

use log::warn;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

type MainCall = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct QueueState {
    calls: Vec<MainCall>,
    /// A wake-up was signalled and the queue has not been drained since
    wake_pending: bool,
    stopped: bool,
}

struct Queue {
    state: Mutex<QueueState>,
    wake: Condvar,
}

/// Thread-safe handle for scheduling callbacks on the executor's owning thread
#[derive(Clone)]
pub struct MainHandle {
    queue: Arc<Queue>,
}

impl MainHandle {
    pub(super) fn new() -> Self {
        Self {
            queue: Arc::new(Queue {
                state: Mutex::new(QueueState::default()),
                wake: Condvar::new(),
            }),
        }
    }

    /// Queue `f` for the owning thread.
    ///
    /// Returns `false` if the executor has stopped and `f` was dropped.
    pub fn call_main(&self, f: impl FnOnce() + Send + 'static) -> bool {
        let mut state = self.queue.state.lock().unwrap();
        if state.stopped {
            warn!("Executor stopped, dropping main-thread callback");
            return false;
        }

        state.calls.push(Box::new(f));
        if !state.wake_pending {
            state.wake_pending = true;
            self.queue.wake.notify_one();
        }
        true
    }

    /// Whether a wake-up is pending, i.e. callbacks wait for a drain
    pub fn is_wake_pending(&self) -> bool {
        self.queue.state.lock().unwrap().wake_pending
    }

    /// Take the queued batch, clearing the pending wake-up
    pub(super) fn take_batch(&self) -> Vec<MainCall> {
        let mut state = self.queue.state.lock().unwrap();
        state.wake_pending = false;
        std::mem::take(&mut state.calls)
    }

    /// Block until a wake-up is pending, the executor stops, or `timeout` passes
    pub(super) fn wait(&self, timeout: Duration) {
        let state = self.queue.state.lock().unwrap();
        let _guard = self
            .queue
            .wake
            .wait_timeout_while(state, timeout, |s| !s.wake_pending && !s.stopped)
            .unwrap();
    }

    /// Mark the queue stopped and drop pending callbacks, returning how many
    pub(super) fn shutdown(&self) -> usize {
        let mut state = self.queue.state.lock().unwrap();
        state.stopped = true;
        state.wake_pending = false;
        let dropped = std::mem::take(&mut state.calls).len();
        self.queue.wake.notify_all();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_is_coalesced() {
        let handle = MainHandle::new();
        assert!(!handle.is_wake_pending());

        handle.call_main(|| {});
        assert!(handle.is_wake_pending());
        handle.call_main(|| {});
        handle.call_main(|| {});

        let batch = handle.take_batch();
        assert_eq!(batch.len(), 3);
        assert!(!handle.is_wake_pending());

        handle.call_main(|| {});
        assert!(handle.is_wake_pending());
    }

    #[test]
    fn test_schedule_from_other_thread() {
        let handle = MainHandle::new();
        let remote = handle.clone();
        std::thread::spawn(move || {
            remote.call_main(|| {});
        })
        .join()
        .unwrap();

        handle.wait(Duration::from_secs(5));
        assert_eq!(handle.take_batch().len(), 1);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let handle = MainHandle::new();
        handle.call_main(|| {});
        assert_eq!(handle.shutdown(), 1);
        assert_eq!(handle.shutdown(), 0);
        assert!(!handle.call_main(|| {}));
    }
}
