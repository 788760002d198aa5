//! Task queries and cooperative cancellation.

use crate::error::{Error, Result};
use crate::types::{ConversionStatus, Task, TaskId};
use std::path::PathBuf;

use super::DocumentConverter;

impl DocumentConverter {
    /// Get the polling view of one conversion
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no task with this id exists (it may have
    /// been evicted).
    pub async fn status(&self, id: &TaskId) -> Result<ConversionStatus> {
        let task = self
            .registry
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("task {}", id)))?;
        Ok(ConversionStatus::from(&task))
    }

    /// Get a raw task snapshot
    pub async fn get_task(&self, id: &TaskId) -> Option<Task> {
        self.registry.get(id).await
    }

    /// List all tracked conversions, newest first
    pub async fn list(&self) -> Vec<ConversionStatus> {
        self.registry
            .list()
            .await
            .iter()
            .map(ConversionStatus::from)
            .collect()
    }

    /// Request cooperative cancellation of a conversion
    ///
    /// Sets the cancel flag on the task record; the pipeline honors it at its
    /// next checkpoint (between extraction pages, or on the next supervisor
    /// tick during synthesis). Cancelling an already-terminal task is a
    /// no-op — the terminal outcome stands.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no task with this id exists.
    pub async fn cancel(&self, id: &TaskId) -> Result<()> {
        let found = self
            .registry
            .update(id, |task| {
                if !task.is_terminal() {
                    task.cancel_requested = true;
                }
            })
            .await;

        if !found {
            return Err(Error::NotFound(format!("task {}", id)));
        }

        tracing::info!(task_id = %id, "Cancellation requested");
        Ok(())
    }

    /// Resolve the artifact path of a successfully completed conversion
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if no task with this id exists
    /// - `Error::InvalidState` if the task is still running or finished
    ///   without an artifact
    pub async fn artifact_path(&self, id: &TaskId) -> Result<PathBuf> {
        let task = self
            .registry
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("task {}", id)))?;

        match &task.artifact {
            Some(artifact) => Ok(self.config.output_dir().join(&artifact.file_name)),
            None => Err(Error::InvalidState {
                id: id.to_string(),
                state: format!("{:?}", task.state).to_lowercase(),
                operation: "fetch artifact".to_string(),
            }),
        }
    }
}
