//! Events flowing between containers, the grid, and the editor surfaces.

use uuid::Uuid;

use super::order::DropPosition;
use crate::widget::{Properties, Widget, WidgetKind};

/// Emitted by a container after a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerEvent {
    /// Full post-drop id order of the container. Carries no positions.
    WidgetsReordered { kind: WidgetKind, ordered_ids: Vec<Uuid> },
    /// A widget from elsewhere was dropped on this container's widget; the
    /// grid decides whether that is allowed.
    WidgetReorderRequested { dragged_id: Uuid, target_id: Uuid, position: DropPosition },
}

/// Everything the grid consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum GridInput {
    WidgetDeleted(Uuid),
    WidgetUpdated { id: Uuid, properties: Properties },
    ContainerReorderRequested { dragged: WidgetKind, target: WidgetKind, position: DropPosition },
    Container(ContainerEvent),
    HomepageChanged,
}

impl From<ContainerEvent> for GridInput {
    fn from(event: ContainerEvent) -> Self {
        Self::Container(event)
    }
}

/// Everything the grid emits for the surrounding shell.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    WidgetCreated(Widget),
    AddWidgetRequested,
    HomepageChanged,
}

/// User-visible message, typically shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Result of a reorder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// New order saved. The collection has been reloaded for widget moves.
    Persisted,
    /// At least one position update failed; a notice was raised and the
    /// collection reloaded from the backend.
    Failed,
    /// Nothing changed and no backend call was made.
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("drag and drop is only available in edit mode")]
    EditModeDisabled,
    #[error("widget dropped onto itself")]
    SameWidget,
    #[error("unknown widget {0}")]
    UnknownWidget(Uuid),
    #[error("cannot move a {dragged} widget among {target} widgets")]
    KindMismatch { dragged: WidgetKind, target: WidgetKind },
    /// A container's id list did not match the widgets of its kind.
    #[error("reported {0} order does not list exactly its widgets")]
    IncompleteOrder(WidgetKind),
    #[error("group dropped onto itself")]
    SameContainer,
    #[error("no {0} group in the display order")]
    UnknownContainer(WidgetKind),
}
