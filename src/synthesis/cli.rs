//! CLI-based synthesizer using an external TTS binary

use super::traits::{SpeechSynthesizer, SynthesisCapabilities};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// CLI-based synthesizer using an external TTS binary
///
/// Executes an espeak-compatible binary, feeding the text on stdin and
/// writing a WAV file to the requested output path. Compatible binaries
/// accept `--stdin` and `-w <file>`.
pub struct CliSynthesizer {
    binary_path: PathBuf,
}

impl CliSynthesizer {
    /// Create a new CLI synthesizer with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find a TTS binary in PATH
    ///
    /// Tries `espeak-ng` first, then `espeak`. Returns `None` if neither is
    /// found.
    pub fn from_path() -> Option<Self> {
        which::which("espeak-ng")
            .or_else(|_| which::which("espeak"))
            .ok()
            .map(Self::new)
    }
}

impl SpeechSynthesizer for CliSynthesizer {
    fn synthesize(&self, text: &str, output: &Path) -> crate::Result<()> {
        let mut child = Command::new(&self.binary_path)
            .arg("--stdin")
            .arg("-w")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                crate::Error::ExternalTool(format!(
                    "Failed to execute {}: {}",
                    self.binary_path.display(),
                    e
                ))
            })?;

        if let Some(stdin) = child.stdin.take() {
            let mut stdin = stdin;
            stdin.write_all(text.as_bytes())?;
            // Drop closes stdin so the binary sees EOF and starts rendering
        }

        let result = child.wait_with_output().map_err(|e| {
            crate::Error::ExternalTool(format!("Failed to wait for TTS binary: {}", e))
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(crate::Error::Synthesis(format!(
                "TTS binary exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }

    fn capabilities(&self) -> SynthesisCapabilities {
        SynthesisCapabilities {
            can_synthesize: true,
        }
    }

    fn name(&self) -> &'static str {
        "cli-tts"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_consistency_with_which_crate() {
        let which_result =
            which::which("espeak-ng").or_else(|_| which::which("espeak"));
        let from_path_result = CliSynthesizer::from_path();

        assert_eq!(
            which_result.is_ok(),
            from_path_result.is_some(),
            "from_path() should return Some if and only if a TTS binary is in PATH"
        );
    }

    #[test]
    fn cli_synthesizer_reports_full_capabilities() {
        let synth = CliSynthesizer::new(PathBuf::from("/usr/bin/espeak-ng"));
        assert!(synth.capabilities().can_synthesize);
        assert_eq!(synth.name(), "cli-tts");
    }

    #[test]
    fn synthesize_with_invalid_binary_path_is_external_tool_error() {
        let synth = CliSynthesizer::new(PathBuf::from("/nonexistent/path/to/tts"));

        let result = synth.synthesize("hello", Path::new("/tmp/out.wav"));

        assert!(result.is_err());
        match result {
            Err(crate::Error::ExternalTool(msg)) => {
                assert!(msg.contains("Failed to execute"));
            }
            other => panic!("Expected ExternalTool error, got: {other:?}"),
        }
    }

    #[test]
    #[ignore] // Requires espeak-ng or espeak in PATH
    fn integration_synthesize_produces_wav_file() {
        use tempfile::TempDir;

        let synth = match CliSynthesizer::from_path() {
            Some(s) => s,
            None => {
                println!("Skipping test: no TTS binary found in PATH");
                return;
            }
        };

        let dir = TempDir::new().expect("Failed to create temp dir");
        let output = dir.path().join("out.wav");

        synth
            .synthesize("Hello from the test suite.", &output)
            .expect("synthesis should succeed");

        let bytes = std::fs::read(&output).expect("output file should exist");
        assert!(bytes.len() > 44, "WAV file should be larger than its header");
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }
}
