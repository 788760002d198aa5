//! Startup and shutdown coordination.

use crate::error::Result;
use crate::types::Event;

use super::DocumentConverter;

impl DocumentConverter {
    /// Gracefully shut down the converter
    ///
    /// This method performs a graceful shutdown sequence:
    /// 1. Requests cancellation of every in-flight conversion
    /// 2. Waits for in-flight conversions to reach a terminal state with a
    ///    timeout (30 seconds)
    /// 3. Emits the shutdown event
    ///
    /// Cancellation is cooperative, so each pipeline winds down at its next
    /// checkpoint and cleans up its own upload and artifact files.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        // 1. Request cancellation of all in-flight conversions
        let cancelled = self.cancel_all_in_flight().await;
        tracing::info!(count = cancelled, "Signaled cancellation to in-flight conversions");

        // 2. Wait for in-flight conversions to wind down with timeout
        let shutdown_timeout = std::time::Duration::from_secs(30);
        let wait_result =
            tokio::time::timeout(shutdown_timeout, self.wait_for_in_flight()).await;

        match wait_result {
            Ok(()) => {
                tracing::info!("All in-flight conversions wound down gracefully");
            }
            Err(_) => {
                tracing::warn!(
                    "Timeout waiting for conversions to wind down, proceeding with shutdown"
                );
            }
        }

        // 3. Emit shutdown event
        let _ = self.event_tx.send(Event::Shutdown);

        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Set the cancel flag on every non-terminal task, returning how many
    /// were signaled.
    async fn cancel_all_in_flight(&self) -> usize {
        let mut count = 0;
        for task in self.registry.list().await {
            if task.is_terminal() {
                continue;
            }
            tracing::debug!(task_id = %task.id, "Signaling cancellation");
            self.registry
                .update(&task.id, |task| {
                    if !task.is_terminal() {
                        task.cancel_requested = true;
                    }
                })
                .await;
            count += 1;
        }
        count
    }

    /// Wait until no tracked task remains in flight
    ///
    /// This is a helper method used during shutdown to wait for the spawned
    /// pipelines to observe their cancel flags and finish cleanup.
    async fn wait_for_in_flight(&self) {
        loop {
            let in_flight = self
                .registry
                .list()
                .await
                .iter()
                .filter(|task| !task.is_terminal())
                .count();

            if in_flight == 0 {
                return;
            }

            tracing::debug!(in_flight, "Waiting for conversions to wind down");
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }
}
