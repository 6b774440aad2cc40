//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and storage transactions so route
//! handlers can stay focused on protocol translation.

pub mod homepage;
pub mod widget;
