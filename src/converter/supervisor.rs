//! Supervision of the blocking synthesis worker.
//!
//! Synthesis runs on a blocking thread and cannot be interrupted. The
//! orchestrator supervises it from async: the worker reports completion over
//! a oneshot channel, while a timer loop trickles progress toward the stage
//! ceiling and watches for cancellation between ticks.

use crate::types::{Event, TaskFailure, TaskId};
use std::path::Path;

use super::DocumentConverter;

/// Synthesis progress never passes this value until the artifact is finalized
const SYNTHESIS_PROGRESS_CEILING: u8 = 89;

/// Rotating status messages shown while the worker renders audio
const SYNTHESIS_STATUS_MESSAGES: [&str; 5] = [
    "Processing audio waveform...",
    "Applying voice modulation...",
    "Adding natural pauses...",
    "Finalizing audio stream...",
    "Encoding audio file...",
];

impl DocumentConverter {
    /// Synthesis stage: run the blocking worker under async supervision
    ///
    /// Returns once the worker has finished, one way or the other. When
    /// cancellation is observed mid-render, progress updates stop but the
    /// worker is waited out before returning, so cleanup never races a
    /// thread that is still writing the artifact.
    pub(crate) async fn run_synthesis_supervised(
        &self,
        id: &TaskId,
        text: String,
        output_path: &Path,
    ) -> Result<(), TaskFailure> {
        let synthesizer = self.synthesizer.clone();
        let output = output_path.to_path_buf();
        let (done_tx, mut done_rx) = tokio::sync::oneshot::channel();

        tokio::task::spawn_blocking(move || {
            let result = synthesizer.synthesize(&text, &output);
            // Receiver gone means the supervisor was aborted; nothing to report to
            done_tx.send(result).ok();
        });

        let poll = self.config.conversion.synthesis_poll_interval;
        let mut tick: usize = 0;

        loop {
            tokio::select! {
                outcome = &mut done_rx => {
                    return match outcome {
                        Ok(Ok(())) => Ok(()),
                        Ok(Err(e)) => {
                            tracing::warn!(task_id = %id, error = %e, "Synthesis failed");
                            Err(TaskFailure::synthesis(e.to_string()))
                        }
                        // Channel dropped without a value: the worker thread died
                        Err(_) => Err(TaskFailure::internal("synthesis worker disappeared")),
                    };
                }
                _ = tokio::time::sleep(poll) => {
                    if self.is_cancel_requested(id).await {
                        tracing::info!(task_id = %id, "Cancellation observed, waiting for synthesis worker");
                        let _ = (&mut done_rx).await;
                        return Err(TaskFailure::cancelled());
                    }

                    let message = SYNTHESIS_STATUS_MESSAGES[tick % SYNTHESIS_STATUS_MESSAGES.len()];
                    tick += 1;
                    let mut reported = 0;
                    self.registry
                        .update(id, |task| {
                            if task.progress < SYNTHESIS_PROGRESS_CEILING {
                                task.progress += 1;
                            }
                            task.status_message = message.to_string();
                            reported = task.progress;
                        })
                        .await;
                    self.emit_event(Event::Synthesizing {
                        id: id.clone(),
                        progress: reported,
                    });
                }
            }
        }
    }
}
