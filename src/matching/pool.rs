//! Worker pool with per-task timeouts.
//!
//! Tasks are submitted up front and collected one by one through their
//! [`TaskHandle`]. Each wait has its own timeout; when it expires the task is
//! abandoned (its result will be dropped) and its [`CancelToken`] is raised so
//! the computation can wind down early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::MatchError;

/// Cooperative cancellation flag shared between a task and its handle.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a task ended from the collector's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome<T> {
    Completed(T),
    TimedOut,
    /// The task returned an error or panicked.
    Failed(String),
}

pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// `None` sizes the pool from the environment (`RAYON_NUM_THREADS` or the CPU count).
    pub fn new(workers: Option<usize>) -> Result<Self, MatchError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|i| format!("core-match-{i}"))
            .panic_handler(|_| tracing::error!("matching task panicked"))
            .build()
            .map_err(|e| MatchError::WorkerPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn num_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queue `job`. A job whose token is already cancelled when a worker picks
    /// it up is skipped.
    pub fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> Result<T, String> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let cancel = CancelToken::new();
        let token = cancel.clone();
        self.pool.spawn(move || {
            if token.is_cancelled() {
                return;
            }
            // The handle may be gone already; nobody wants the result then.
            let _ = tx.send(job(&token));
        });
        TaskHandle { rx, cancel }
    }
}

pub struct TaskHandle<T> {
    rx: Receiver<Result<T, String>>,
    cancel: CancelToken,
}

impl<T> TaskHandle<T> {
    /// Wait up to `timeout` for the task. A zero timeout does not wait at all.
    pub fn wait(self, timeout: Duration) -> TaskOutcome<T> {
        if timeout.is_zero() {
            self.cancel.cancel();
            return TaskOutcome::TimedOut;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(Ok(value)) => TaskOutcome::Completed(value),
            Ok(Err(reason)) => TaskOutcome::Failed(reason),
            Err(RecvTimeoutError::Timeout) => {
                self.cancel.cancel();
                TaskOutcome::TimedOut
            }
            Err(RecvTimeoutError::Disconnected) => {
                TaskOutcome::Failed("task ended without a result".to_string())
            }
        }
    }
}
