//! Bounded-concurrency task queue.
//!
//! Caps how many analysis pipelines run at once so an entire uploaded batch
//! of images never executes (and holds memory) simultaneously. Waiting
//! callers are admitted in FIFO submission order via the tokio semaphore's
//! fair queueing.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Default concurrency ceiling, chosen to bound memory use when a whole
/// batch of images is resident at once.
pub const DEFAULT_MAX_PARALLEL: usize = 3;

/// Snapshot of queue occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStatus {
    /// Tasks waiting for a free slot
    pub queued: usize,
    /// Tasks currently executing
    pub running: usize,
}

/// FIFO task queue with a fixed concurrency ceiling.
///
/// `add` suspends the caller until a slot is free, runs the work inline, and
/// returns its output. A task's failure (its output being an `Err`) reaches
/// only that task's caller; the queue keeps dequeuing regardless.
pub struct TaskQueue {
    semaphore: Semaphore,
    max_parallel: usize,
    queued: AtomicUsize,
    running: AtomicUsize,
}

impl TaskQueue {
    /// Create a queue allowing at most `max_parallel` concurrent tasks.
    pub fn new(max_parallel: usize) -> Self {
        Self {
            semaphore: Semaphore::new(max_parallel),
            max_parallel,
            queued: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
        }
    }

    /// Enqueue `work` and suspend until it has run to completion.
    ///
    /// `id` is for observability only — two tasks may share one. No
    /// cancellation once started; the work runs to completion and its
    /// output is handed back to this caller.
    pub async fn add<T>(&self, id: &str, work: impl Future<Output = T>) -> T {
        self.queued.fetch_add(1, Ordering::SeqCst);
        let permit = self.semaphore.acquire().await;
        self.queued.fetch_sub(1, Ordering::SeqCst);

        // The semaphore is never closed while the queue is alive; if it is
        // somehow closed, run unbounded rather than wedging the caller.
        let _permit = match permit {
            Ok(p) => Some(p),
            Err(_) => {
                tracing::error!("task queue semaphore closed unexpectedly");
                None
            }
        };

        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("queue start: {id} ({running}/{})", self.max_parallel);

        let output = work.await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!("queue done: {id}");
        output
    }

    /// Current queue occupancy.
    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            queued: self.queued.load(Ordering::SeqCst),
            running: self.running.load(Ordering::SeqCst),
        }
    }

    /// The configured concurrency ceiling.
    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PARALLEL)
    }
}
