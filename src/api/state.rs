use std::sync::Arc;

use crate::models::ContextDefaults;
use crate::services::ImageCatalog;

/// Shared application state
///
/// Holds no per-request data; every resolution builds its own catalog
/// snapshot on top of `catalog`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ImageCatalog>,
    pub defaults: ContextDefaults,
}

impl AppState {
    pub fn new(catalog: Arc<dyn ImageCatalog>, defaults: ContextDefaults) -> Self {
        Self { catalog, defaults }
    }
}
