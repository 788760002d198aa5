//! Terminal transitions and artifact/source cleanup.

use crate::config::WebhookEvent;
use crate::error::Error;
use crate::types::{Event, FailureCode, ResultArtifact, TaskFailure, TaskId, TaskState};
use std::path::Path;

use super::{DocumentConverter, TriggerWebhooksParams};

impl DocumentConverter {
    /// Record a successful conversion: artifact details, progress 100,
    /// source-file cleanup, events, and webhooks
    pub(crate) async fn finalize_success(
        &self,
        id: &TaskId,
        upload_path: &Path,
        output_path: &Path,
    ) -> crate::Result<()> {
        let metadata = tokio::fs::metadata(output_path).await?;
        let size_bytes = metadata.len();

        // Measure duration from the WAV header; fall back to the text-length
        // estimate when the header cannot be parsed
        let snapshot = self.registry.get(id).await;
        let estimated = snapshot
            .as_ref()
            .map(|t| t.metrics.estimated_duration_secs)
            .unwrap_or(0.0);
        let header = read_prefix(output_path, 8192).await?;
        let duration_secs = crate::synthesis::wav_duration_secs(&header).unwrap_or(estimated);

        let file_name = output_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::Other("artifact path has no file name".to_string()))?;
        let artifact = ResultArtifact {
            file_name,
            size_bytes,
            duration_secs,
        };

        let recorded = artifact.clone();
        self.registry
            .update(id, move |task| {
                if task.is_terminal() {
                    return;
                }
                task.state = TaskState::Completed;
                task.progress = 100;
                task.status_message = "Conversion complete".to_string();
                task.artifact = Some(recorded);
            })
            .await;

        remove_quietly(upload_path).await;

        tracing::info!(task_id = %id, artifact = %artifact.file_name,
            size_bytes, duration_secs, "Conversion complete");
        self.emit_event(Event::Completed {
            id: id.clone(),
            artifact: artifact.clone(),
        });
        if let Some(task) = snapshot {
            self.trigger_webhooks(TriggerWebhooksParams {
                event_type: WebhookEvent::OnComplete,
                task_id: id.clone(),
                filename: task.original_filename,
                state: "completed".to_string(),
                audio_file: Some(artifact.file_name),
                error: None,
            });
        }

        Ok(())
    }

    /// Record a failed or cancelled conversion and clean up partial files
    ///
    /// Deletes the partial artifact and the uploaded source, then records the
    /// failure on the task. Safe to call on any failure path; an already
    /// terminal task is left untouched.
    pub(crate) async fn finalize_failure(
        &self,
        id: &TaskId,
        failure: TaskFailure,
        upload_path: &Path,
        output_path: &Path,
    ) {
        remove_quietly(output_path).await;
        remove_quietly(upload_path).await;

        let cancelled = failure.code == FailureCode::Cancelled;
        let recorded = failure.clone();
        self.registry
            .update(id, move |task| {
                if task.is_terminal() {
                    return;
                }
                task.state = TaskState::Completed;
                task.progress = 100;
                task.status_message = if cancelled {
                    "Cancelled".to_string()
                } else {
                    "Conversion failed".to_string()
                };
                task.error = Some(recorded);
            })
            .await;

        let filename = self
            .registry
            .get(id)
            .await
            .map(|t| t.original_filename)
            .unwrap_or_default();

        if cancelled {
            tracing::info!(task_id = %id, "Conversion cancelled");
            self.emit_event(Event::Cancelled { id: id.clone() });
            self.trigger_webhooks(TriggerWebhooksParams {
                event_type: WebhookEvent::OnCancelled,
                task_id: id.clone(),
                filename,
                state: "cancelled".to_string(),
                audio_file: None,
                error: Some(failure.message),
            });
        } else {
            tracing::warn!(task_id = %id, code = failure.code.as_str(),
                error = %failure.message, "Conversion failed");
            self.emit_event(Event::Failed {
                id: id.clone(),
                code: failure.code,
                error: failure.message.clone(),
            });
            self.trigger_webhooks(TriggerWebhooksParams {
                event_type: WebhookEvent::OnFailed,
                task_id: id.clone(),
                filename,
                state: "failed".to_string(),
                audio_file: None,
                error: Some(failure.message),
            });
        }
    }
}

/// Read up to `limit` bytes from the start of a file
async fn read_prefix(path: &Path, limit: usize) -> std::io::Result<Vec<u8>> {
    use tokio::io::AsyncReadExt;

    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = vec![0u8; limit];
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}

/// Delete a file, logging anything other than it already being gone
async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete file");
        }
    }
}
