//! Per-task orchestration and the extraction stage.
//!
//! Each submission gets one orchestrating async task. The orchestrator runs
//! the two pipeline stages inside a nested spawn so a panic anywhere in stage
//! code is caught at the join boundary and converted into a terminal
//! internal-fault outcome instead of leaving the task stuck in flight.

use crate::types::{Event, TaskFailure, TaskId, TaskState};
use std::path::{Path, PathBuf};

use super::DocumentConverter;

impl DocumentConverter {
    /// Drive one conversion from upload to terminal state
    ///
    /// Never returns an error: every outcome, including panics in stage code,
    /// is recorded on the task record.
    pub(crate) async fn run_conversion(self, id: TaskId, upload_path: PathBuf) {
        // The artifact path is fixed up front so cleanup on any failure path
        // can delete partial output without re-deriving it
        let output_name = upload_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| format!("{}.wav", s))
            .unwrap_or_else(|| format!("{}.wav", id));
        let output_path = self.config.output_dir().join(output_name);

        let converter = self.clone();
        let inner_id = id.clone();
        let inner_upload = upload_path.clone();
        let inner_output = output_path.clone();
        let handle = tokio::spawn(async move {
            converter
                .convert_inner(inner_id, inner_upload, inner_output)
                .await
        });

        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                tracing::error!(task_id = %id, "Conversion pipeline panicked");
                Err(TaskFailure::internal("conversion pipeline panicked"))
            }
            Err(_) => Err(TaskFailure::internal("conversion pipeline aborted")),
        };

        match result {
            Ok(()) => {
                if let Err(e) = self.finalize_success(&id, &upload_path, &output_path).await {
                    tracing::error!(task_id = %id, error = %e, "Failed to finalize conversion");
                    self.finalize_failure(
                        &id,
                        TaskFailure::internal(format!("finalization failed: {}", e)),
                        &upload_path,
                        &output_path,
                    )
                    .await;
                }
            }
            Err(failure) => {
                self.finalize_failure(&id, failure, &upload_path, &output_path)
                    .await;
            }
        }
    }

    async fn convert_inner(
        &self,
        id: TaskId,
        upload_path: PathBuf,
        output_path: PathBuf,
    ) -> Result<(), TaskFailure> {
        let text = self.run_extraction(&id, &upload_path).await?;

        self.registry
            .update(&id, |task| {
                task.state = TaskState::Synthesizing;
                task.progress = task.progress.max(40);
                task.status_message = "Initializing speech engine...".to_string();
            })
            .await;
        self.emit_event(Event::Synthesizing {
            id: id.clone(),
            progress: 40,
        });

        self.run_synthesis_supervised(&id, text, &output_path).await
    }

    /// Extraction stage: page-by-page text extraction with progress 5 → 40
    ///
    /// Progress advances linearly with pages, one atomic registry update per
    /// page, and cancellation is checked between pages.
    async fn run_extraction(
        &self,
        id: &TaskId,
        upload_path: &Path,
    ) -> Result<String, TaskFailure> {
        self.registry
            .update(id, |task| {
                task.state = TaskState::Extracting;
                task.progress = task.progress.max(5);
                task.status_message = "Opening document...".to_string();
            })
            .await;
        if self.is_cancel_requested(id).await {
            return Err(TaskFailure::cancelled());
        }

        let source = self
            .extractor
            .open(upload_path)
            .await
            .map_err(|e| TaskFailure::extraction(e.to_string()))?;
        let total = source.page_count();
        self.registry
            .update(id, |task| {
                task.metrics.pages_total = total as u64;
            })
            .await;

        let mut text = String::new();
        let mut total_chars: u64 = 0;
        for index in 0..total {
            let page = source
                .extract_page(index)
                .await
                .map_err(|e| TaskFailure::extraction(e.to_string()))?;
            total_chars += page.chars().count() as u64;
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&page);

            let progress = (5 + ((index + 1) * 35) / total) as u8;
            let estimated =
                total_chars as f64 / self.config.conversion.estimate_chars_per_second as f64;
            self.registry
                .update(id, |task| {
                    task.progress = task.progress.max(progress);
                    task.status_message = format!("Extracting page {}/{}...", index + 1, total);
                    task.metrics.pages_processed = (index + 1) as u64;
                    task.metrics.text_chars = total_chars;
                    task.metrics.estimated_duration_secs = estimated;
                })
                .await;
            self.emit_event(Event::Extracting {
                id: id.clone(),
                progress,
                pages_processed: (index + 1) as u64,
                pages_total: total as u64,
            });

            if self.is_cancel_requested(id).await {
                return Err(TaskFailure::cancelled());
            }
            let delay = self.config.conversion.page_delay;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        if text.trim().is_empty() {
            return Err(TaskFailure::extraction("no extractable content"));
        }

        tracing::debug!(task_id = %id, pages = total, chars = total_chars,
            "Extraction complete");

        Ok(text)
    }

    /// Whether the task's cancel flag is set
    pub(crate) async fn is_cancel_requested(&self, id: &TaskId) -> bool {
        self.registry
            .get(id)
            .await
            .map(|task| task.cancel_requested)
            .unwrap_or(false)
    }
}
