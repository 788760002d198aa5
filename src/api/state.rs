//! Application state for the API server

use crate::{Config, DocumentConverter};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the converter instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main DocumentConverter instance
    pub converter: Arc<DocumentConverter>,

    /// Configuration (read access for handlers)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(converter: Arc<DocumentConverter>, config: Arc<Config>) -> Self {
        Self { converter, config }
    }
}
