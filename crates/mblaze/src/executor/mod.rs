//! Background work dispatch
//!
//! Queries block on external processes, so front-ends run them on a worker
//! pool and get the results back on their own thread. The [`Executor`]
//! owns both halves:
//!
//! - a rayon thread pool for blocking work ([`Executor::call_worker`]);
//! - a main-thread queue of callbacks ([`MainHandle::call_main`]) that the
//!   owning thread drains with [`Executor::process_main`] or
//!   [`Executor::wait_main`].
//!
//! Scheduling onto the main queue is allowed from any thread. Only the
//! first call after a drain signals a wake-up, so a burst of completions
//! costs the owning loop a single wake.
//!
//! There is no cancellation: submitted work always runs to completion.
//! Callers that may issue overlapping requests for the same target must
//! discard stale results themselves.

mod main_queue;

use log::{error, info};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

pub use main_queue::MainHandle;

use crate::error::{Error, Result};

/// Owned worker pool plus main-thread callback queue
///
/// Not `Send`: the thread that starts the executor is the one that drains
/// its main queue. Use [`Executor::main_handle`] to schedule from elsewhere.
pub struct Executor {
    pool: rayon::ThreadPool,
    main: MainHandle,
    _owner: PhantomData<Rc<()>>,
}

/// Pending result of a worker job
pub struct WorkHandle<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> WorkHandle<T> {
    /// Block until the job finishes and return its result
    ///
    /// Fails with [`Error::WorkerLost`] if the job panicked.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().map_err(|_| Error::WorkerLost)
    }

}

impl Executor {
    /// Start the executor with `workers` pool threads, or one per CPU
    pub fn start(workers: Option<usize>) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|i| format!("mbtree-worker-{}", i))
            .panic_handler(|_| error!("Worker job panicked"))
            .build()
            .map_err(|e| Error::ExecutorStart(e.to_string()))?;

        info!("Executor started with {} workers", pool.current_num_threads());

        Ok(Self {
            pool,
            main: MainHandle::new(),
            _owner: PhantomData,
        })
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// A thread-safe handle for scheduling main-thread callbacks
    pub fn main_handle(&self) -> MainHandle {
        self.main.clone()
    }

    /// Schedule `f` to run on the owning thread at the next drain
    ///
    /// Returns `false` if the executor has stopped and `f` was dropped.
    pub fn call_main(&self, f: impl FnOnce() + Send + 'static) -> bool {
        self.main.call_main(f)
    }

    /// Run `f` on a worker thread
    pub fn call_worker<T, F>(&self, f: F) -> WorkHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        self.pool.spawn(move || {
            // The handle may have been dropped; the result is then discarded
            let _ = tx.send(f());
        });
        WorkHandle { rx }
    }

    /// Run `f` on a worker thread, then hand its result to `done` on the
    /// owning thread
    ///
    /// `done` always runs once per call while the executor is alive: a
    /// panic in `f` is delivered as [`Error::WorkerLost`]. The returned
    /// handle resolves once `f` has finished, before `done` runs.
    pub fn call_worker_then<T, F, D>(&self, f: F, done: D) -> WorkHandle<()>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        D: FnOnce(Result<T>) + Send + 'static,
        T: Send + 'static,
    {
        let main = self.main.clone();
        self.call_worker(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
                error!("Worker job panicked");
                Err(Error::WorkerLost)
            });
            main.call_main(move || done(result));
        })
    }

    /// Run the callbacks queued so far on the calling thread
    ///
    /// Returns how many ran. Callbacks scheduled while the batch runs wait
    /// for the next drain.
    pub fn process_main(&self) -> usize {
        let batch = self.main.take_batch();
        let count = batch.len();
        for call in batch {
            call();
        }
        count
    }

    /// Wait up to `timeout` for a wake-up, then drain the main queue
    pub fn wait_main(&self, timeout: Duration) -> usize {
        self.main.wait(timeout);
        self.process_main()
    }

    /// Stop the executor
    ///
    /// Pending main-thread callbacks are dropped and counted; later
    /// schedules are ignored. Jobs already running on the pool finish but
    /// their callbacks are discarded.
    pub fn stop(self) -> usize {
        let dropped = self.main.shutdown();
        info!("Executor stopped, {} pending callbacks dropped", dropped);
        dropped
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        self.main.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_call_worker_returns_result() {
        let executor = Executor::start(Some(2)).unwrap();
        assert_eq!(executor.workers(), 2);

        let handle = executor.call_worker(|| 6 * 7);
        assert_eq!(handle.wait().unwrap(), 42);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let executor = Executor::start(Some(1)).unwrap();
        let handle = executor.call_worker(|| -> usize { panic!("boom") });
        assert!(matches!(handle.wait(), Err(Error::WorkerLost)));

        // The pool survives the panic
        assert_eq!(executor.call_worker(|| 1).wait().unwrap(), 1);
    }

    #[test]
    fn test_done_callback_runs_on_owner_thread() {
        let executor = Executor::start(Some(2)).unwrap();
        let owner = std::thread::current().id();

        let (tx, rx) = mpsc::channel();
        let handle = executor.call_worker_then(
            || Ok(7),
            move |value: Result<i32>| {
                tx.send((value.unwrap(), std::thread::current().id())).unwrap();
            },
        );
        handle.wait().unwrap();
        assert!(rx.try_recv().is_err());

        assert_eq!(executor.process_main(), 1);
        let (value, thread) = rx.recv().unwrap();
        assert_eq!(value, 7);
        assert_eq!(thread, owner);
    }

    #[test]
    fn test_worker_panic_still_reports_back() {
        let executor = Executor::start(Some(1)).unwrap();
        let (tx, rx) = mpsc::channel();

        let handle = executor.call_worker_then(
            || -> Result<usize> { panic!("boom") },
            move |result: Result<usize>| {
                tx.send(result).unwrap();
            },
        );
        handle.wait().unwrap();

        assert_eq!(executor.process_main(), 1);
        assert!(matches!(rx.recv().unwrap(), Err(Error::WorkerLost)));
    }

    #[test]
    fn test_main_calls_run_in_order() {
        let executor = Executor::start(Some(1)).unwrap();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            assert!(executor.call_main(move || order.lock().unwrap().push(i)));
        }
        assert_eq!(executor.process_main(), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(executor.process_main(), 0);
    }

    #[test]
    fn test_wait_main_wakes_on_schedule() {
        let executor = Executor::start(Some(1)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        executor.call_worker_then(|| Ok(5), move |v: Result<usize>| {
            c.fetch_add(v.unwrap(), Ordering::SeqCst);
        });

        let mut ran = 0;
        for _ in 0..100 {
            ran += executor.wait_main(Duration::from_millis(50));
            if ran > 0 {
                break;
            }
        }
        assert_eq!(ran, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_wait_main_times_out() {
        let executor = Executor::start(Some(1)).unwrap();
        assert_eq!(executor.wait_main(Duration::from_millis(10)), 0);
    }

    #[test]
    fn test_stop_drops_pending_calls() {
        let executor = Executor::start(Some(1)).unwrap();
        let handle = executor.main_handle();
        handle.call_main(|| {});
        handle.call_main(|| {});

        assert_eq!(executor.stop(), 2);
        assert!(!handle.call_main(|| {}));
    }
}
