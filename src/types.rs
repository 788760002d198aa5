//! Core types for docvox

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::{format_duration, format_file_size};

/// Unique identifier for a conversion task
///
/// Opaque hex string generated at submission time (UUIDv4). Task IDs are
/// never reused within a process lifetime.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a fresh random task ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle state of a conversion task
///
/// `Completed` is terminal and is reached on success, failure, and
/// cancellation alike; [`Task::error`] distinguishes the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Created, pipeline not started yet
    Initializing,
    /// Extracting text from the source document
    Extracting,
    /// Synthesizing audio from the extracted text
    Synthesizing,
    /// Terminal - either an artifact or an error is set
    Completed,
}

impl TaskState {
    /// Whether this state is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed)
    }
}

/// Stable machine-readable cause of a failed conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    /// Malformed or unsupported input, detected before any stage ran
    ValidationFailure,
    /// Extraction collaborator error or zero extractable content
    ExtractionFailure,
    /// Synthesis collaborator error
    SynthesisFailure,
    /// Cooperative cancellation honored
    Cancelled,
    /// Unexpected fault anywhere in the pipeline
    InternalFault,
}

impl FailureCode {
    /// The stable snake_case code string used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCode::ValidationFailure => "validation_failure",
            FailureCode::ExtractionFailure => "extraction_failure",
            FailureCode::SynthesisFailure => "synthesis_failure",
            FailureCode::Cancelled => "cancelled",
            FailureCode::InternalFault => "internal_fault",
        }
    }
}

/// Terminal failure detail: stable code plus human-readable message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskFailure {
    /// Machine-readable failure code
    pub code: FailureCode,
    /// Human-readable message
    pub message: String,
}

impl TaskFailure {
    /// Cancellation outcome - message is the stable string "cancelled"
    pub fn cancelled() -> Self {
        Self {
            code: FailureCode::Cancelled,
            message: "cancelled".to_string(),
        }
    }

    /// Extraction stage failure
    pub fn extraction(message: impl Into<String>) -> Self {
        Self {
            code: FailureCode::ExtractionFailure,
            message: message.into(),
        }
    }

    /// Synthesis stage failure
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self {
            code: FailureCode::SynthesisFailure,
            message: message.into(),
        }
    }

    /// Unexpected internal fault
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: FailureCode::InternalFault,
            message: message.into(),
        }
    }
}

/// Extraction stage metrics, populated incrementally while Extracting
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractionMetrics {
    /// Total number of pages in the source document
    pub pages_total: u64,

    /// Pages processed so far
    pub pages_processed: u64,

    /// Characters of text extracted so far
    pub text_chars: u64,

    /// Estimated audio duration in seconds, derived from text length
    pub estimated_duration_secs: f64,
}

/// Output artifact produced by a successful conversion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultArtifact {
    /// Artifact file name within the output directory
    pub file_name: String,

    /// Artifact size in bytes
    pub size_bytes: u64,

    /// Measured audio duration in seconds
    pub duration_secs: f64,
}

/// One tracked conversion job and its full lifecycle state
///
/// Mutated exclusively by its own orchestrator through the registry's atomic
/// update primitive; readers always receive cloned snapshots. Once
/// [`TaskState::Completed`] is reached no field mutates again.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,

    /// Original filename of the uploaded document
    pub original_filename: String,

    /// Size of the uploaded document in bytes
    pub source_size_bytes: u64,

    /// Current lifecycle state
    pub state: TaskState,

    /// Progress percentage in [0,100], non-decreasing until terminal
    pub progress: u8,

    /// Short human-readable description of current activity
    pub status_message: String,

    /// Extraction stage metrics
    pub metrics: ExtractionMetrics,

    /// Output artifact - set only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ResultArtifact>,

    /// Failure detail - set on any non-success terminal outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskFailure>,

    /// Whether cooperative cancellation has been requested
    pub cancel_requested: bool,

    /// When the task was submitted (eviction ordering key)
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in the Initializing state
    pub fn new(id: TaskId, original_filename: impl Into<String>, source_size_bytes: u64) -> Self {
        Self {
            id,
            original_filename: original_filename.into(),
            source_size_bytes,
            state: TaskState::Initializing,
            progress: 0,
            status_message: "Initializing...".to_string(),
            metrics: ExtractionMetrics::default(),
            artifact: None,
            error: None,
            cancel_requested: false,
            created_at: Utc::now(),
        }
    }

    /// Whether the task has reached its terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Event emitted during a conversion's lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Task created and queued for conversion
    Submitted {
        /// Task ID
        id: TaskId,
        /// Original filename
        filename: String,
    },

    /// Extraction stage progress update
    Extracting {
        /// Task ID
        id: TaskId,
        /// Progress percentage
        progress: u8,
        /// Pages processed so far
        pages_processed: u64,
        /// Total pages
        pages_total: u64,
    },

    /// Synthesis stage progress update
    Synthesizing {
        /// Task ID
        id: TaskId,
        /// Progress percentage
        progress: u8,
    },

    /// Conversion completed successfully
    Completed {
        /// Task ID
        id: TaskId,
        /// The produced artifact
        artifact: ResultArtifact,
    },

    /// Conversion failed
    Failed {
        /// Task ID
        id: TaskId,
        /// Stable failure code
        code: FailureCode,
        /// Error message
        error: String,
    },

    /// Conversion cancelled by the caller
    Cancelled {
        /// Task ID
        id: TaskId,
    },

    /// Terminal task removed from the registry under capacity pressure
    Evicted {
        /// Task ID
        id: TaskId,
    },

    /// Webhook delivery failed
    WebhookFailed {
        /// Webhook URL
        url: String,
        /// Error message
        error: String,
    },

    /// Graceful shutdown initiated
    Shutdown,
}

/// Polling view of a conversion, including formatted display fields
///
/// This is the JSON shape returned by `GET /conversions/:id`. The formatted
/// fields save API consumers from re-implementing size/duration rendering.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversionStatus {
    /// Task ID
    pub id: TaskId,

    /// Original filename of the uploaded document
    pub original_filename: String,

    /// Size of the uploaded document in bytes
    pub source_size_bytes: u64,

    /// Current lifecycle state
    pub state: TaskState,

    /// Progress percentage in [0,100]
    pub progress: u8,

    /// Current activity description
    pub status: String,

    /// Whether the task is terminal
    pub completed: bool,

    /// Whether cancellation has been requested
    pub cancel_requested: bool,

    /// Stable failure code, if the task failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<FailureCode>,

    /// Failure message, if the task failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Artifact file name, if the task succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,

    /// Artifact size in bytes, if the task succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_size_bytes: Option<u64>,

    /// Measured audio duration in seconds, if the task succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_duration_secs: Option<f64>,

    /// Total pages in the source document
    pub pages_total: u64,

    /// Pages processed so far
    pub pages_processed: u64,

    /// Characters of extracted text
    pub text_chars: u64,

    /// Estimated audio duration in seconds
    pub est_duration_secs: f64,

    /// Extracted text length, formatted for display ("12,345 chars")
    pub formatted_text_length: String,

    /// Estimated duration, formatted for display
    pub formatted_est_duration: String,

    /// Artifact size, formatted for display ("-" until success)
    pub formatted_audio_size: String,

    /// Measured duration, formatted for display ("-" until success)
    pub formatted_actual_duration: String,

    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for ConversionStatus {
    fn from(task: &Task) -> Self {
        let formatted_text_length = if task.metrics.text_chars > 0 {
            format!("{} chars", group_thousands(task.metrics.text_chars))
        } else {
            "0 chars".to_string()
        };
        let formatted_est_duration = if task.metrics.estimated_duration_secs > 0.0 {
            format_duration(task.metrics.estimated_duration_secs)
        } else {
            "0 sec".to_string()
        };
        let formatted_audio_size = task
            .artifact
            .as_ref()
            .map(|a| format_file_size(a.size_bytes))
            .unwrap_or_else(|| "-".to_string());
        let formatted_actual_duration = task
            .artifact
            .as_ref()
            .map(|a| format_duration(a.duration_secs))
            .unwrap_or_else(|| "-".to_string());

        Self {
            id: task.id.clone(),
            original_filename: task.original_filename.clone(),
            source_size_bytes: task.source_size_bytes,
            state: task.state,
            progress: task.progress,
            status: task.status_message.clone(),
            completed: task.is_terminal(),
            cancel_requested: task.cancel_requested,
            error_code: task.error.as_ref().map(|e| e.code),
            error: task.error.as_ref().map(|e| e.message.clone()),
            audio_file: task.artifact.as_ref().map(|a| a.file_name.clone()),
            audio_size_bytes: task.artifact.as_ref().map(|a| a.size_bytes),
            actual_duration_secs: task.artifact.as_ref().map(|a| a.duration_secs),
            pages_total: task.metrics.pages_total,
            pages_processed: task.metrics.pages_processed,
            text_chars: task.metrics.text_chars,
            est_duration_secs: task.metrics.estimated_duration_secs,
            formatted_text_length,
            formatted_est_duration,
            formatted_audio_size,
            formatted_actual_duration,
            created_at: task.created_at,
        }
    }
}

/// Render an integer with comma thousands separators ("1234567" -> "1,234,567")
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// System capability report
///
/// Describes which collaborators are available, so API consumers can detect
/// degraded deployments (for example, a host with no TTS binary) before
/// submitting work.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Capabilities {
    /// Speech synthesis capabilities
    pub synthesis: SynthesisCapabilitiesInfo,
    /// Active document extractor name
    pub extractor: String,
}

/// Synthesis capability details
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SynthesisCapabilitiesInfo {
    /// Whether audio can be produced
    pub can_synthesize: bool,
    /// Active synthesizer backend name
    pub backend: String,
}

/// Payload sent to webhooks on terminal transitions
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookPayload {
    /// Event type ("complete", "failed", "cancelled")
    pub event: String,

    /// Task ID
    pub task_id: TaskId,

    /// Original filename
    pub filename: String,

    /// Final task state as string
    pub state: String,

    /// Artifact file name (for successful conversions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,

    /// Error message (for failed conversions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Timestamp of the event (Unix timestamp in seconds)
    pub timestamp: i64,
}
