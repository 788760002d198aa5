//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`conversions`] — Conversion task management
//! - [`system`] — Health, capabilities, events, OpenAPI

mod conversions;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use conversions::*;
pub use system::*;
