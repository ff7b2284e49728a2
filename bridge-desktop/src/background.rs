//! Background Worker Implementation

use bridge_traits::{
    background::{WorkerExecutor, WorkerJob},
    error::{BridgeError, Result},
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Tokio-based worker for desktop.
///
/// A single task drains the job channel, so jobs run one at a time in the
/// order they were submitted. A panicking job is logged and the worker moves
/// on to the next one.
pub struct TokioWorkerExecutor {
    name: String,
    sender: Mutex<Option<mpsc::UnboundedSender<WorkerJob>>>,
}

impl TokioWorkerExecutor {
    /// Create a worker on the current Tokio runtime.
    ///
    /// Fails with `BridgeError::NotAvailable` outside a runtime.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| {
            BridgeError::NotAvailable(format!("No Tokio runtime for worker: {}", e))
        })?;
        Ok(Self::on_runtime(&handle, name))
    }

    /// Create a worker on the given runtime.
    pub fn on_runtime(handle: &Handle, name: impl Into<String>) -> Self {
        let name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<WorkerJob>();

        let worker_name = name.clone();
        handle.spawn(async move {
            debug!(worker = %worker_name, "Worker started");
            while let Some(job) = receiver.recv().await {
                if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                    error!(worker = %worker_name, "Worker job panicked");
                }
            }
            debug!(worker = %worker_name, "Worker stopped");
        });

        Self {
            name,
            sender: Mutex::new(Some(sender)),
        }
    }

    /// Worker name used in logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop accepting jobs. Jobs already queued still run.
    pub fn shutdown(&self) {
        let mut sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        if sender.take().is_some() {
            debug!(worker = %self.name, "Worker shutting down");
        }
    }
}

impl WorkerExecutor for TokioWorkerExecutor {
    fn submit(&self, job: WorkerJob) -> Result<()> {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        let sender = sender.as_ref().ok_or_else(|| {
            BridgeError::NotAvailable(format!("Worker '{}' has shut down", self.name))
        })?;

        sender.send(job).map_err(|_| {
            BridgeError::NotAvailable(format!("Worker '{}' is no longer running", self.name))
        })
    }

    fn is_available(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }
}
