//! Backend client used by the grid and the CLI.

pub mod backend;
pub mod http;

pub use backend::{BackendError, WidgetBackend};
pub use http::{Health, HttpBackend};
