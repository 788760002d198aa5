//! Traits and types for speech synthesis

use std::path::Path;

/// Capabilities of a synthesizer implementation
#[derive(Debug, Clone, Copy)]
pub struct SynthesisCapabilities {
    /// Can produce audio output
    pub can_synthesize: bool,
}

/// Trait for speech synthesis backends
///
/// `synthesize` is a blocking call and may run for minutes on large inputs.
/// It cannot be interrupted once started; the conversion pipeline invokes it
/// on a blocking thread and keeps supervising progress and cancellation from
/// async. Implementations must be callable from any thread.
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into an audio file at `output`
    ///
    /// Blocks until the whole input has been rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The external binary fails to start or exits non-zero (for CLI
    ///   implementations)
    /// - The output file cannot be written
    /// - The operation is not supported (for stub implementations)
    fn synthesize(&self, text: &str, output: &Path) -> crate::Result<()>;

    /// Query capabilities of this synthesizer
    fn capabilities(&self) -> SynthesisCapabilities;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
