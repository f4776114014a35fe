//! Periodic background save of a shared wizard session

use super::controller::WizardController;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Controller shared between the command loop and the autosave task
pub type SharedController = Arc<Mutex<WizardController>>;

/// Shortest period accepted for the timer
pub const MIN_AUTOSAVE_PERIOD: Duration = Duration::from_secs(1);

/// Running autosave task. Dropping the handle stops the timer.
pub struct AutosaveHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutosaveHandle {
    /// Start saving `controller` every `period` while it has unsaved
    /// changes. Ticks missed while a save or a command holds the lock are
    /// skipped rather than replayed.
    pub fn spawn(controller: SharedController, period: Duration) -> Self {
        let period = period.max(MIN_AUTOSAVE_PERIOD);
        let (tx, mut rx) = oneshot::channel();
        // First deadline counts from spawn, not from the task's first poll
        let start = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::debug!("Autosave started with period {period:?}");

            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = ticker.tick() => {
                        let mut controller = controller.lock().await;
                        if controller.is_submitted() {
                            tracing::debug!("Session submitted, stopping autosave");
                            break;
                        }
                        if controller.autosave().await {
                            tracing::debug!("Autosaved draft");
                        }
                    }
                }
            }
            tracing::debug!("Autosave stopped");
        });

        Self {
            shutdown: Some(tx),
            task: Some(task),
        }
    }

    /// Whether the timer task is still alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the timer and wait for an in-flight save to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Autosave task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
