use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use crate::controller::AdmissionController;

/// Handle to a running sweep task.
///
/// Dropping the handle signals the task to exit at its next wake-up;
/// [`SweepHandle::stop`] also waits for it to finish.
#[derive(Debug)]
pub struct SweepHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SweepHandle {
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!(error = %err, "quota sweeper task failed");
            }
        }
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

impl AdmissionController {
    /// Spawn a task that sweeps the table every `reset_interval`, starting
    /// one full interval from now. Requires a running tokio runtime.
    pub fn start_sweeper(self: &Arc<Self>) -> SweepHandle {
        let period = self.policy().reset_interval;
        let controller = Arc::clone(self);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = period.as_secs(), "quota sweeper started");
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        controller.sweep();
                    }
                }
            }
            debug!("quota sweeper stopped");
        });

        SweepHandle {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }
}
