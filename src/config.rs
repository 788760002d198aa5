//! Configuration types for docvox

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Conversion behavior configuration (directories, upload limits, pacing)
///
/// Groups settings related to how uploads are accepted, extracted, and
/// synthesized. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversionConfig {
    /// Directory for uploaded source documents (default: "uploads")
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Directory for generated audio artifacts (default: "outputs")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum accepted upload size in bytes (default: 50 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Accepted source file extensions, lowercase without dot (default: ["txt", "text"])
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Speaking rate used to estimate audio duration from text length,
    /// in characters per second (default: 15)
    #[serde(default = "default_chars_per_second")]
    pub estimate_chars_per_second: u64,

    /// Pause between extracted pages, giving pollers observable intermediate
    /// progress (default: 50 ms; set to zero to disable pacing)
    #[serde(default = "default_page_delay", with = "duration_ms_serde")]
    pub page_delay: Duration,

    /// How often the synthesis supervisor wakes to trickle progress and check
    /// for cancellation while the synthesis worker runs (default: 800 ms)
    #[serde(default = "default_synthesis_poll_interval", with = "duration_ms_serde")]
    pub synthesis_poll_interval: Duration,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
            estimate_chars_per_second: default_chars_per_second(),
            page_delay: default_page_delay(),
            synthesis_poll_interval: default_synthesis_poll_interval(),
        }
    }
}

/// Task registry retention configuration
///
/// Controls when old terminal tasks are evicted to bound memory.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistryConfig {
    /// Advisory registry capacity; eviction triggers when a new submission
    /// would exceed it (default: 100)
    #[serde(default = "default_registry_capacity")]
    pub capacity: usize,

    /// How many of the oldest terminal tasks to evict per pass (default: 50)
    #[serde(default = "default_evict_batch")]
    pub evict_batch: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: default_registry_capacity(),
            evict_batch: default_evict_batch(),
        }
    }
}

/// External tool paths (TTS binary)
///
/// Groups settings for the external speech synthesis binary.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to TTS executable (auto-detected if None)
    #[serde(default)]
    pub tts_path: Option<PathBuf>,

    /// Whether to search PATH for the TTS binary if no explicit path is set
    /// (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            tts_path: None,
            search_path: true,
        }
    }
}

/// Notification configuration (webhooks)
///
/// Groups settings for external notifications triggered by conversion events.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NotificationConfig {
    /// Webhook configurations
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
}

/// Main configuration for DocumentConverter
///
/// Fields are organized into logical sub-configs for maintainability:
/// - [`conversion`](ConversionConfig) — directories, upload limits, pacing
/// - [`registry`](RegistryConfig) — task retention and eviction
/// - [`tools`](ToolsConfig) — external TTS binary paths
/// - [`notifications`](NotificationConfig) — webhooks
/// - [`api`](ApiConfig) — REST API server
///
/// All sub-config fields are flattened for backward-compatible serialization,
/// meaning the JSON format remains unchanged (no nesting).
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Conversion behavior settings (directories, limits, pacing)
    #[serde(flatten)]
    pub conversion: ConversionConfig,

    /// Task retention and eviction settings
    #[serde(flatten)]
    pub registry: RegistryConfig,

    /// External TTS tool paths
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Notification settings (webhooks)
    #[serde(flatten)]
    pub notifications: NotificationConfig,

    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

// Convenience accessors — allow call sites to use `config.upload_dir()` etc.
// without reaching through the sub-config structs.
impl Config {
    /// Upload directory
    pub fn upload_dir(&self) -> &PathBuf {
        &self.conversion.upload_dir
    }

    /// Output directory for audio artifacts
    pub fn output_dir(&self) -> &PathBuf {
        &self.conversion.output_dir
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:6780)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Webhook configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookConfig {
    /// URL to POST to
    pub url: String,

    /// Events that trigger this webhook
    pub events: Vec<WebhookEvent>,

    /// Optional authentication header value
    #[serde(default)]
    pub auth_header: Option<String>,

    /// Timeout for webhook requests (default: 30 seconds)
    #[serde(default = "default_webhook_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

/// Webhook trigger event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WebhookEvent {
    /// Triggered when a conversion completes successfully
    OnComplete,
    /// Triggered when a conversion fails
    OnFailed,
    /// Triggered when a conversion is cancelled
    OnCancelled,
    /// Triggered when a conversion is submitted
    OnSubmitted,
}

// Default value functions
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_max_upload_bytes() -> u64 {
    50 * 1024 * 1024 // 50 MiB
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["txt".into(), "text".into()]
}

fn default_chars_per_second() -> u64 {
    15
}

fn default_page_delay() -> Duration {
    Duration::from_millis(50)
}

fn default_synthesis_poll_interval() -> Duration {
    Duration::from_millis(800)
}

fn default_registry_capacity() -> usize {
    100
}

fn default_evict_batch() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6780))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_webhook_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds, for sub-second intervals)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
