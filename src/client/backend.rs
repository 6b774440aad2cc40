//! Backend seam used by the grid.
//!
//! The grid only needs the widget CRUD and position calls. Keeping them
//! behind a trait lets tests drive the grid with an in-memory backend and
//! inject failures per call.

use uuid::Uuid;

use crate::widget::{NewWidget, Properties, Widget};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl BackendError {
    /// True for a 404 response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Widget CRUD + position API. No retries; every call either succeeds or
/// reports a `BackendError`.
#[async_trait::async_trait]
pub trait WidgetBackend: Send + Sync {
    /// All widgets on the active homepage.
    async fn list(&self) -> Result<Vec<Widget>, BackendError>;

    async fn create(&self, request: NewWidget) -> Result<Widget, BackendError>;

    /// Replace properties. Never touches position.
    async fn update(&self, widget_id: Uuid, properties: Properties) -> Result<Widget, BackendError>;

    /// Set the sort key. Never touches properties.
    async fn update_position(&self, widget_id: Uuid, position: u32) -> Result<Widget, BackendError>;

    async fn delete(&self, widget_id: Uuid) -> Result<(), BackendError>;
}
