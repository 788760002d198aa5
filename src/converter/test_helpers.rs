//! Shared test helpers for creating DocumentConverter instances in tests.

use crate::config::Config;
use crate::converter::DocumentConverter;
use crate::extraction::{DocumentExtractor, PageSource, TextDocumentExtractor};
use crate::registry::TaskRegistry;
use async_trait::async_trait;
use crate::synthesis::{SpeechSynthesizer, SynthesisCapabilities};
use crate::types::{Task, TaskId};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Controllable synthesizer for pipeline tests: renders instantly, slowly, or
/// fails, without any external binary.
pub(crate) struct MockSynthesizer {
    render_time: Duration,
    fail_with: Option<String>,
}

impl MockSynthesizer {
    /// Succeeds immediately with a small valid WAV artifact
    pub(crate) fn instant() -> Self {
        Self {
            render_time: Duration::ZERO,
            fail_with: None,
        }
    }

    /// Succeeds after blocking for `render_time`
    pub(crate) fn slow(render_time: Duration) -> Self {
        Self {
            render_time,
            fail_with: None,
        }
    }

    /// Fails with a synthesis error after blocking for `render_time`
    pub(crate) fn failing(message: &str, render_time: Duration) -> Self {
        Self {
            render_time,
            fail_with: Some(message.to_string()),
        }
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn synthesize(&self, _text: &str, output: &Path) -> crate::Result<()> {
        if !self.render_time.is_zero() {
            std::thread::sleep(self.render_time);
        }
        if let Some(message) = &self.fail_with {
            return Err(crate::Error::Synthesis(message.clone()));
        }
        std::fs::write(output, test_wav_bytes(2.0))?;
        Ok(())
    }

    fn capabilities(&self) -> SynthesisCapabilities {
        SynthesisCapabilities {
            can_synthesize: true,
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Scripted behavior for one page of a [`ScriptedExtractor`] document
#[derive(Clone, Copy)]
pub(crate) enum ScriptedPage {
    /// Page extracts successfully with this text
    Text(&'static str),
    /// Page extraction fails with this error message
    Fails(&'static str),
    /// Page extraction panics, exercising the recovery boundary
    Panics,
}

/// Extractor whose per-page behavior is scripted up front, for driving the
/// pipeline through collaborator errors and panics without a real document.
pub(crate) struct ScriptedExtractor {
    pages: Vec<ScriptedPage>,
}

impl ScriptedExtractor {
    pub(crate) fn new(pages: Vec<ScriptedPage>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl DocumentExtractor for ScriptedExtractor {
    async fn open(&self, _path: &Path) -> crate::Result<Box<dyn PageSource>> {
        Ok(Box::new(ScriptedSource {
            pages: self.pages.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct ScriptedSource {
    pages: Vec<ScriptedPage>,
}

#[async_trait]
impl PageSource for ScriptedSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn extract_page(&self, index: usize) -> crate::Result<String> {
        match self.pages[index] {
            ScriptedPage::Text(text) => Ok(text.to_string()),
            ScriptedPage::Fails(message) => Err(crate::Error::Extraction(message.to_string())),
            ScriptedPage::Panics => panic!("scripted page fault"),
        }
    }
}

/// A minimal valid WAV file whose header declares the given duration
pub(crate) fn test_wav_bytes(duration_secs: f64) -> Vec<u8> {
    let byte_rate: u32 = 44_100;
    let data_size = (duration_secs * byte_rate as f64) as u32;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&22_050u32.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());
    bytes
}

/// Helper to create a test DocumentConverter with tempdir-backed directories,
/// zero page pacing, and a fast supervisor tick.
/// Returns the converter and the tempdir (which must be kept alive).
pub(crate) async fn create_test_converter(
    synthesizer: Arc<dyn SpeechSynthesizer>,
) -> (DocumentConverter, tempfile::TempDir) {
    create_test_converter_with(synthesizer, |_| {}).await
}

/// Like [`create_test_converter`], but lets the caller adjust the config
/// (page pacing, registry capacity, upload limits) before construction.
pub(crate) async fn create_test_converter_with(
    synthesizer: Arc<dyn SpeechSynthesizer>,
    adjust: impl FnOnce(&mut Config),
) -> (DocumentConverter, tempfile::TempDir) {
    build_test_converter(Arc::new(TextDocumentExtractor::new()), synthesizer, adjust).await
}

/// Like [`create_test_converter`], but with a custom extractor (typically a
/// [`ScriptedExtractor`]) driving the extraction stage.
pub(crate) async fn create_test_converter_with_extractor(
    extractor: Arc<dyn DocumentExtractor>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
) -> (DocumentConverter, tempfile::TempDir) {
    build_test_converter(extractor, synthesizer, |_| {}).await
}

async fn build_test_converter(
    extractor: Arc<dyn DocumentExtractor>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    adjust: impl FnOnce(&mut Config),
) -> (DocumentConverter, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();

    let mut config = Config::default();
    config.conversion.upload_dir = temp_dir.path().join("uploads");
    config.conversion.output_dir = temp_dir.path().join("outputs");
    config.conversion.page_delay = Duration::ZERO;
    config.conversion.synthesis_poll_interval = Duration::from_millis(10);
    adjust(&mut config);

    std::fs::create_dir_all(&config.conversion.upload_dir).unwrap();
    std::fs::create_dir_all(&config.conversion.output_dir).unwrap();

    let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

    let converter = DocumentConverter {
        registry: Arc::new(TaskRegistry::new()),
        event_tx,
        config: Arc::new(config),
        extractor,
        synthesizer,
    };

    (converter, temp_dir)
}

/// Poll until the task reaches its terminal state, panicking after 5 seconds
pub(crate) async fn wait_for_terminal(converter: &DocumentConverter, id: &TaskId) -> Task {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(task) = converter.get_task(id).await {
                if task.is_terminal() {
                    return task;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("task did not reach a terminal state in time")
}
