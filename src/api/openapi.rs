//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the docvox REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the docvox REST API
///
/// This struct is used to generate the OpenAPI 3.1 specification that describes
/// all available endpoints, request/response types, and API behavior.
///
/// The spec can be accessed via:
/// - `/api/v1/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "docvox REST API",
        version = "0.2.0",
        description = "OpenAPI 3.1 compliant REST API for converting documents to speech and tracking conversion progress",
        contact(
            name = "docvox",
            url = "https://github.com/docvox/docvox"
        ),
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6780/api/v1", description = "Local development server")
    ),
    paths(
        // Conversions
        crate::api::routes::list_conversions,
        crate::api::routes::get_conversion,
        crate::api::routes::submit_conversion,
        crate::api::routes::cancel_conversion,
        crate::api::routes::download_artifact,

        // System
        crate::api::routes::get_capabilities,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::TaskId,
        crate::types::TaskState,
        crate::types::FailureCode,
        crate::types::TaskFailure,
        crate::types::ExtractionMetrics,
        crate::types::ResultArtifact,
        crate::types::ConversionStatus,
        crate::types::Event,
        crate::types::Capabilities,
        crate::types::SynthesisCapabilitiesInfo,

        // Config types from config.rs
        crate::config::Config,
        crate::config::ConversionConfig,
        crate::config::RegistryConfig,
        crate::config::ToolsConfig,
        crate::config::NotificationConfig,
        crate::config::ApiConfig,
        crate::config::WebhookConfig,
        crate::config::WebhookEvent,
    )),
    tags(
        (name = "conversions", description = "Document-to-speech conversion tasks"),
        (name = "system", description = "Health, capabilities, and event streaming")
    )
)]
pub struct ApiDoc;
