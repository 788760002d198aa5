//! Upload validation, task creation, and pipeline spawning.

use crate::error::{Error, Result};
use crate::types::{Event, Task, TaskId};
use crate::utils::sanitize_filename;

use super::DocumentConverter;

impl DocumentConverter {
    /// Submit a document for conversion
    ///
    /// Validates the upload, persists it to the upload directory, registers a
    /// new task, and spawns the conversion pipeline. Returns immediately with
    /// the task id; progress is observed through [`status`](Self::status) or
    /// the event stream.
    ///
    /// Submission is also the registry's capacity checkpoint: when the task
    /// count has reached the configured capacity, the oldest terminal tasks
    /// are evicted (and their artifacts deleted) before the new task is
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the upload is rejected before any
    /// pipeline stage runs:
    /// - Empty filename
    /// - Extension not in `allowed_extensions`
    /// - Empty file content
    /// - Content larger than `max_upload_bytes`
    pub async fn submit(&self, original_filename: &str, content: &[u8]) -> Result<TaskId> {
        self.validate_upload(original_filename, content)?;

        // Capacity checkpoint: make room before registering the new task
        let evicted = self
            .registry
            .evict_oldest_terminal(self.config.registry.capacity, self.config.registry.evict_batch)
            .await;
        for task in evicted {
            if let Some(artifact) = &task.artifact {
                let path = self.config.output_dir().join(&artifact.file_name);
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(task_id = %task.id, path = %path.display(), error = %e,
                            "Failed to delete evicted artifact");
                    }
                }
            }
            tracing::debug!(task_id = %task.id, "Evicted terminal task");
            self.emit_event(Event::Evicted {
                id: task.id.clone(),
            });
        }

        let id = TaskId::generate();
        let sanitized = sanitize_filename(original_filename);
        let upload_path = self
            .config
            .upload_dir()
            .join(format!("{}_{}", id, sanitized));
        tokio::fs::write(&upload_path, content).await?;

        let task = Task::new(id.clone(), original_filename, content.len() as u64);
        self.registry.insert(task).await;

        tracing::info!(task_id = %id, filename = %original_filename,
            size_bytes = content.len(), "Conversion submitted");
        self.emit_event(Event::Submitted {
            id: id.clone(),
            filename: original_filename.to_string(),
        });
        self.trigger_webhooks(super::TriggerWebhooksParams {
            event_type: crate::config::WebhookEvent::OnSubmitted,
            task_id: id.clone(),
            filename: original_filename.to_string(),
            state: "initializing".to_string(),
            audio_file: None,
            error: None,
        });

        // Spawn the pipeline; the task record is its only channel back
        let converter = self.clone();
        let task_id = id.clone();
        tokio::spawn(async move {
            converter.run_conversion(task_id, upload_path).await;
        });

        Ok(id)
    }

    fn validate_upload(&self, original_filename: &str, content: &[u8]) -> Result<()> {
        if original_filename.trim().is_empty() {
            return Err(Error::Validation("no file provided".to_string()));
        }

        let extension = std::path::Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !self
            .config
            .conversion
            .allowed_extensions
            .iter()
            .any(|allowed| allowed == &extension)
        {
            return Err(Error::Validation(format!(
                "unsupported file type: .{} (allowed: {})",
                extension,
                self.config.conversion.allowed_extensions.join(", ")
            )));
        }

        if content.is_empty() {
            return Err(Error::Validation("empty file".to_string()));
        }

        if content.len() as u64 > self.config.conversion.max_upload_bytes {
            return Err(Error::Validation(format!(
                "file exceeds maximum size of {} bytes",
                self.config.conversion.max_upload_bytes
            )));
        }

        Ok(())
    }
}
