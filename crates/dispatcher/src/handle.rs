//! DispatchHandle - controls a dispatcher running on its own task

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use crate::dispatcher::DispatchReport;
use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;

/// Handle to a spawned dispatcher
///
/// Dropping the handle leaves the dispatcher running until it drains.
pub struct DispatchHandle {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<Result<DispatchReport, DispatcherError>>,
    metrics: Arc<DispatchMetrics>,
}

impl DispatchHandle {
    pub(crate) fn new(
        stop_tx: oneshot::Sender<()>,
        task: JoinHandle<Result<DispatchReport, DispatcherError>>,
        metrics: Arc<DispatchMetrics>,
    ) -> Self {
        Self {
            stop_tx,
            task,
            metrics,
        }
    }

    /// Live counters of the running dispatcher
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the timer and wait for the task
    ///
    /// A tick already in progress completes first.
    #[instrument(name = "dispatch_handle_stop", skip(self))]
    pub async fn stop(self) -> Result<DispatchReport, DispatcherError> {
        // Err means the task already returned
        if self.stop_tx.send(()).is_err() {
            debug!("Dispatcher already finished");
        }
        Self::await_task(self.task).await
    }

    /// Wait for the dispatcher to drain
    pub async fn join(self) -> Result<DispatchReport, DispatcherError> {
        let Self { stop_tx, task, .. } = self;
        let report = Self::await_task(task).await;
        drop(stop_tx);
        report
    }

    async fn await_task(
        task: JoinHandle<Result<DispatchReport, DispatcherError>>,
    ) -> Result<DispatchReport, DispatcherError> {
        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(error = ?e, "Dispatch task panicked");
                Err(DispatcherError::task_failed(e.to_string()))
            }
        }
    }
}
