//! Shared edit-mode switch.
//!
//! Drag-and-drop only takes effect while edit mode is on. The grid and every
//! container hold clones of the same handle, so flipping it once is seen
//! everywhere without polling.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct EditMode(Arc<AtomicBool>);

impl EditMode {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    /// Flip the switch and return the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "edit_mode_test.rs"]
mod tests;
