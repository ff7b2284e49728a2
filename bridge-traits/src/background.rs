//! Background Execution
//!
//! Provides the worker abstraction that loaders run on. Hosts supply the
//! execution context: a UI framework's loader thread, a WorkManager job, or
//! the Tokio-backed worker from `bridge-desktop`.

use std::future::Future;

use futures::channel::oneshot;
use futures::future::BoxFuture;

use crate::error::{BridgeError, Result};

/// Unit of work submitted to a [`WorkerExecutor`].
pub type WorkerJob = BoxFuture<'static, ()>;

/// Dedicated background worker
///
/// Implementations must run submitted jobs one at a time, in submission
/// order. A loader instance never sees two of its jobs running concurrently.
///
/// # Platform Notes
///
/// - **Android**: a single-threaded executor owned by the loader manager
/// - **Desktop**: a Tokio task draining a channel
///
/// # Example
///
/// ```ignore
/// use bridge_traits::background::{run_on_worker, WorkerExecutor};
///
/// async fn count(executor: &dyn WorkerExecutor) -> Result<usize> {
///     run_on_worker(executor, async { 42 }).await
/// }
/// ```
pub trait WorkerExecutor: Send + Sync {
    /// Queue a job for execution on the worker.
    ///
    /// Returns `BridgeError::NotAvailable` if the worker has shut down.
    fn submit(&self, job: WorkerJob) -> Result<()>;

    /// Whether the worker still accepts jobs
    fn is_available(&self) -> bool {
        true
    }
}

/// Run `task` on the worker and wait for its output.
///
/// The output travels back over a oneshot channel. If the worker drops the
/// job before it completes, the call fails with `BridgeError::NotAvailable`.
pub async fn run_on_worker<T, F>(executor: &dyn WorkerExecutor, task: F) -> Result<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    executor.submit(Box::pin(async move {
        // The caller may have stopped waiting; the output is discarded then.
        let _ = tx.send(task.await);
    }))?;

    rx.await.map_err(|_| {
        BridgeError::NotAvailable("Worker dropped the job before it completed".to_string())
    })
}
