//! One rendered group of same-kind widgets.
//!
//! DESIGN
//! ======
//! A container owns only display order. After an internal drop it rearranges
//! its own children and reports the full id list; it never computes or
//! sends positions. Drops that involve a widget it does not hold are handed
//! up to the grid as a reorder request.

use tracing::{debug, warn};
use uuid::Uuid;

use super::edit_mode::EditMode;
use super::events::ContainerEvent;
use super::order::{DropPosition, move_relative};
use crate::widget::{Widget, WidgetKind};

#[derive(Debug, Clone)]
pub struct Container {
    kind: WidgetKind,
    widgets: Vec<Widget>,
    edit_mode: EditMode,
}

impl Container {
    #[must_use]
    pub fn new(kind: WidgetKind, edit_mode: EditMode) -> Self {
        Self { kind, widgets: Vec::new(), edit_mode }
    }

    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Append a widget, or replace it in place if its id is already here.
    /// Widgets of another kind are refused.
    pub fn add_widget(&mut self, widget: Widget) -> bool {
        if widget.kind != self.kind {
            warn!(container = %self.kind, widget_id = %widget.id, widget_kind = %widget.kind, "refusing widget of another kind");
            return false;
        }
        if let Some(existing) = self.widgets.iter_mut().find(|w| w.id == widget.id) {
            *existing = widget;
        } else {
            self.widgets.push(widget);
        }
        true
    }

    pub fn remove_widget(&mut self, widget_id: Uuid) -> Option<Widget> {
        let index = self.widgets.iter().position(|w| w.id == widget_id)?;
        Some(self.widgets.remove(index))
    }

    pub fn clear_widgets(&mut self) {
        self.widgets.clear();
    }

    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    #[must_use]
    pub fn contains(&self, widget_id: Uuid) -> bool {
        self.widgets.iter().any(|w| w.id == widget_id)
    }

    #[must_use]
    pub fn ordered_ids(&self) -> Vec<Uuid> {
        self.widgets.iter().map(|w| w.id).collect()
    }

    /// Handle a widget dropped on `target_id`.
    ///
    /// Both widgets here: reorder children and emit `WidgetsReordered`.
    /// Only the target here: emit `WidgetReorderRequested`. Anything else,
    /// or edit mode off, does nothing.
    pub fn drop_widget(&mut self, dragged_id: Uuid, target_id: Uuid, position: DropPosition) -> Option<ContainerEvent> {
        if !self.edit_mode.is_enabled() {
            debug!(container = %self.kind, "drop ignored outside edit mode");
            return None;
        }
        if !self.contains(target_id) {
            return None;
        }
        if !self.contains(dragged_id) {
            return Some(ContainerEvent::WidgetReorderRequested { dragged_id, target_id, position });
        }

        let mut ids = self.ordered_ids();
        if !move_relative(&mut ids, &dragged_id, &target_id, position) {
            return None;
        }
        self.widgets.sort_by_key(|w| ids.iter().position(|id| *id == w.id));
        Some(ContainerEvent::WidgetsReordered { kind: self.kind, ordered_ids: ids })
    }
}

#[cfg(test)]
#[path = "container_test.rs"]
mod tests;
