//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the YAML store behind an async `RwLock`; every mutation takes
//! the write lock, changes the document, saves, and releases.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::storage::YamlStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the store is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<YamlStore>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: YamlStore) -> Self {
        Self { store: Arc::new(RwLock::new(store)) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
