//! # docvox
//!
//! Embeddable backend for document-to-speech conversion with progress tracking.
//!
//! ## Design Philosophy
//!
//! docvox is designed to be:
//! - **Highly configurable** - Pacing, limits, and directories can be customized
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, with polling as a fallback
//!
//! ## Quick Start
//!
//! ```no_run
//! use docvox::{Config, DocumentConverter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let converter = DocumentConverter::new(config).await?;
//!
//!     // Subscribe to events
//!     let mut events = converter.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Submit a document and poll its progress
//!     let id = converter.submit("book.txt", b"Once upon a time...").await?;
//!     let status = converter.status(&id).await?;
//!     println!("{}% - {}", status.progress, status.status);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Core conversion engine (decomposed into focused submodules)
pub mod converter;
/// Error types
pub mod error;
/// Document text extraction
pub mod extraction;
/// In-memory task registry
pub mod registry;
/// Speech synthesis backends
pub mod synthesis;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{Config, WebhookConfig, WebhookEvent};
pub use converter::DocumentConverter;
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use extraction::{DocumentExtractor, PageSource, TextDocumentExtractor};
pub use registry::TaskRegistry;
pub use synthesis::{
    CliSynthesizer, NoOpSynthesizer, SpeechSynthesizer, SynthesisCapabilities, wav_duration_secs,
};
pub use types::{
    Capabilities, ConversionStatus, Event, ExtractionMetrics, FailureCode, ResultArtifact, Task,
    TaskFailure, TaskId, TaskState,
};

/// Helper function to run the converter with graceful signal handling.
///
/// Waits for a termination signal and then calls the converter's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use docvox::{Config, DocumentConverter, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let converter = DocumentConverter::new(config).await?;
///
///     // Run with automatic signal handling
///     run_with_shutdown(converter).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(converter: DocumentConverter) -> Result<()> {
    wait_for_signal().await;
    converter.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
