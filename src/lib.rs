//! good-neighbor — a personal new-tab homepage of draggable widget groups.
//!
//! ARCHITECTURE
//! ============
//! Server side: `storage` keeps homepages and widgets in one YAML file,
//! `services` apply the business rules, `routes` expose them over HTTP.
//!
//! Client side: `client` talks to that API, and `grid` owns the widget
//! collection, its per-kind containers, and drag-and-drop reordering.

pub mod client;
pub mod config;
pub mod grid;
pub mod homepage;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod widget;
