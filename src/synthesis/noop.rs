//! No-op synthesizer for graceful degradation

use super::traits::{SpeechSynthesizer, SynthesisCapabilities};
use std::path::Path;

/// No-op synthesizer used when no TTS engine is available
///
/// Returns `Error::NotSupported` from `synthesize`, so submissions fail with
/// a clear message instead of the process refusing to start. This keeps the
/// registry, API, and polling surface fully functional on hosts without a
/// TTS binary.
pub struct NoOpSynthesizer;

impl SpeechSynthesizer for NoOpSynthesizer {
    fn synthesize(&self, _text: &str, _output: &Path) -> crate::Result<()> {
        Err(crate::Error::NotSupported(
            "Speech synthesis requires an external TTS binary. \
             Configure tts_path in config or ensure espeak-ng is in PATH."
                .into(),
        ))
    }

    fn capabilities(&self) -> SynthesisCapabilities {
        SynthesisCapabilities {
            can_synthesize: false,
        }
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
