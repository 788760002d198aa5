//! Core conversion engine split into focused submodules.
//!
//! The `DocumentConverter` struct and its methods are organized by domain:
//! - [`submit`] - Upload validation, task creation, and pipeline spawning
//! - [`control`] - Task queries and cooperative cancellation
//! - [`lifecycle`] - Graceful shutdown coordination
//! - [`pipeline`] - Per-task orchestration and the extraction stage
//! - [`supervisor`] - Supervision of the blocking synthesis worker
//! - [`finalize`] - Terminal transitions and artifact/source cleanup
//! - [`webhooks`] - Webhook notifications

mod control;
mod finalize;
mod lifecycle;
mod pipeline;
mod submit;
mod supervisor;
mod webhooks;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use webhooks::TriggerWebhooksParams;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extraction::{DocumentExtractor, TextDocumentExtractor};
use crate::registry::TaskRegistry;
use crate::synthesis::{CliSynthesizer, NoOpSynthesizer, SpeechSynthesizer};

/// Main conversion engine (cloneable - all fields are Arc-wrapped)
///
/// Owns the task registry and the extraction/synthesis collaborators, and
/// spawns one orchestrating async task per submitted conversion. All public
/// methods are safe to call concurrently.
#[derive(Clone)]
pub struct DocumentConverter {
    /// Task registry holding every tracked conversion
    /// Public for integration tests to inspect task records
    pub registry: std::sync::Arc<TaskRegistry>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<crate::types::Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: std::sync::Arc<Config>,
    /// Document extractor (trait object for pluggable document formats)
    pub(crate) extractor: std::sync::Arc<dyn DocumentExtractor>,
    /// Speech synthesizer (trait object for pluggable TTS backends)
    pub(crate) synthesizer: std::sync::Arc<dyn SpeechSynthesizer>,
}

impl DocumentConverter {
    /// Create a new DocumentConverter instance
    ///
    /// This initializes all core components:
    /// - Creates the upload and output directories
    /// - Sets up the event broadcast channel
    /// - Selects a synthesizer based on configured tool paths
    pub async fn new(config: Config) -> Result<Self> {
        // Ensure upload and output directories exist
        tokio::fs::create_dir_all(&config.conversion.upload_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create upload directory '{}': {}",
                        config.conversion.upload_dir.display(),
                        e
                    ),
                ))
            })?;
        tokio::fs::create_dir_all(&config.conversion.output_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create output directory '{}': {}",
                        config.conversion.output_dir.display(),
                        e
                    ),
                ))
            })?;

        // Create broadcast channel with buffer size of 1000 events
        // This allows multiple subscribers to receive all events independently
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        // Select synthesizer based on config
        let synthesizer: std::sync::Arc<dyn SpeechSynthesizer> =
            if let Some(ref tts_path) = config.tools.tts_path {
                // Use explicitly configured binary path
                std::sync::Arc::new(CliSynthesizer::new(tts_path.clone()))
            } else if config.tools.search_path {
                // Search PATH for a TTS binary
                CliSynthesizer::from_path()
                    .map(|s| std::sync::Arc::new(s) as std::sync::Arc<dyn SpeechSynthesizer>)
                    .unwrap_or_else(|| std::sync::Arc::new(NoOpSynthesizer))
            } else {
                // No binary configured and PATH search disabled
                std::sync::Arc::new(NoOpSynthesizer)
            };

        let synth_caps = synthesizer.capabilities();
        tracing::info!(
            synthesizer = synthesizer.name(),
            can_synthesize = synth_caps.can_synthesize,
            "Synthesizer initialized"
        );

        Ok(Self {
            registry: std::sync::Arc::new(TaskRegistry::new()),
            event_tx,
            config: std::sync::Arc::new(config),
            extractor: std::sync::Arc::new(TextDocumentExtractor::new()),
            synthesizer,
        })
    }

    /// Subscribe to conversion events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events independently.
    /// Events are buffered, but if a subscriber falls behind by more than 1000 events,
    /// it will receive a `RecvError::Lagged` error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docvox::{DocumentConverter, Config};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let converter = DocumentConverter::new(Config::default()).await?;
    ///
    ///     let mut events = converter.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             tracing::info!(?event, "conversion event");
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::types::Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    ///
    /// The configuration is wrapped in an Arc, so this is a cheap clone
    /// operation.
    pub fn get_config(&self) -> std::sync::Arc<Config> {
        std::sync::Arc::clone(&self.config)
    }

    /// Query the current system capabilities
    ///
    /// Returns information about which collaborators are available based on
    /// configuration and discovered external tools.
    pub fn capabilities(&self) -> crate::types::Capabilities {
        let synth_caps = self.synthesizer.capabilities();

        crate::types::Capabilities {
            synthesis: crate::types::SynthesisCapabilitiesInfo {
                can_synthesize: synth_caps.can_synthesize,
                backend: self.synthesizer.name().to_string(),
            },
            extractor: self.extractor.name().to_string(),
        }
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped
    /// (ok() converts Err to None), so the pipeline never blocks on listeners.
    pub(crate) fn emit_event(&self, event: crate::types::Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server runs concurrently with conversion processing and listens on
    /// the configured bind address (default: 127.0.0.1:6780).
    pub fn spawn_api_server(self: &std::sync::Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let converter = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(converter, config).await })
    }
}
