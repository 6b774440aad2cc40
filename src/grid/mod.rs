//! Widget grid — owns the widget collection and reconciles reorders.
//!
//! SYSTEM CONTEXT
//! ==============
//! The grid is the client-side core. It loads widgets from a
//! `WidgetBackend`, partitions them by kind into containers, keeps the
//! container display order in a `UiStore`, and turns drag-and-drop gestures
//! into position updates.
//!
//! DESIGN
//! ======
//! Widget reorders are optimistic: the local collection is renumbered
//! 0..N-1 and rendered first, then one position update per widget goes out
//! concurrently. Success or failure, the collection is reloaded afterwards,
//! so the backend is the source of truth once the batch settles. A failed
//! batch also raises a notice.
//!
//! Container order is client-only and never touches the backend.
//!
//! Every awaiting operation takes `&mut self`, so one grid never runs two
//! operations at once and the last completed load wins.

pub mod container;
pub mod edit_mode;
pub mod events;
pub mod order;
pub mod ui_store;

use futures::future::join_all;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub use container::Container;
pub use edit_mode::EditMode;
pub use events::{ContainerEvent, GridEvent, GridInput, Notice, RejectReason, ReorderOutcome};
pub use order::{DropPosition, move_relative};
pub use ui_store::{CONTAINER_ORDER_KEY, JsonFileStore, MemoryStore, UiStore};

use crate::client::WidgetBackend;
use crate::widget::{NewWidget, Properties, Widget, WidgetKind};

/// What the grid area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    Loading,
    Ready,
    /// Load failed; the shell offers a retry.
    Failed { message: String },
}

/// Partition widgets by kind. Kinds appear in first-encounter order and
/// each group keeps source order.
#[must_use]
pub fn group_by_type(widgets: &[Widget]) -> Vec<(WidgetKind, Vec<&Widget>)> {
    let mut groups: Vec<(WidgetKind, Vec<&Widget>)> = Vec::new();
    for widget in widgets {
        match groups.iter_mut().find(|(kind, _)| *kind == widget.kind) {
            Some((_, group)) => group.push(widget),
            None => groups.push((widget.kind, vec![widget])),
        }
    }
    groups
}

pub struct Grid<B, S> {
    backend: B,
    store: S,
    edit_mode: EditMode,
    widgets: Vec<Widget>,
    container_order: Vec<WidgetKind>,
    containers: Vec<Container>,
    view: GridView,
    loading: bool,
    notices: Vec<Notice>,
    events: Vec<GridEvent>,
}

impl<B: WidgetBackend, S: UiStore> Grid<B, S> {
    /// Build an empty grid. The stored container order is read here; tags
    /// that no longer name a widget kind are dropped.
    pub fn new(backend: B, store: S, edit_mode: EditMode) -> Self {
        let container_order = load_container_order(&store);
        Self {
            backend,
            store,
            edit_mode,
            widgets: Vec::new(),
            container_order,
            containers: Vec::new(),
            view: GridView::Loading,
            loading: false,
            notices: Vec::new(),
            events: Vec::new(),
        }
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    #[must_use]
    pub fn view(&self) -> &GridView {
        &self.view
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Rendered containers in display order. Kinds with no widgets are not
    /// rendered.
    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    #[must_use]
    pub fn container(&self, kind: WidgetKind) -> Option<&Container> {
        self.containers.iter().find(|c| c.kind() == kind)
    }

    #[must_use]
    pub fn container_order(&self) -> &[WidgetKind] {
        &self.container_order
    }

    /// Collection as last loaded or patched.
    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    #[must_use]
    pub fn widget(&self, widget_id: Uuid) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == widget_id)
    }

    #[must_use]
    pub fn edit_mode(&self) -> &EditMode {
        &self.edit_mode
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn ui_store(&self) -> &S {
        &self.store
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn group_by_type(&self) -> Vec<(WidgetKind, Vec<&Widget>)> {
        group_by_type(&self.widgets)
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Fetch every widget and replace the collection wholesale. On failure
    /// the view switches to `Failed` and the previous collection is kept.
    pub async fn load(&mut self) {
        self.loading = true;
        if self.view != GridView::Ready {
            self.view = GridView::Loading;
        }

        match self.backend.list().await {
            Ok(widgets) => {
                debug!(count = widgets.len(), "loaded widgets");
                self.widgets = widgets;
                self.render();
                self.view = GridView::Ready;
            }
            Err(e) => {
                error!(error = %e, "failed to load widgets");
                self.view = GridView::Failed { message: format!("Failed to load widgets: {e}") };
            }
        }
        self.loading = false;
    }

    pub async fn refresh(&mut self) {
        self.load().await;
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    // =========================================================================
    // CONTAINER ORDER
    // =========================================================================

    /// Seed the container order from `available` if it is empty, otherwise
    /// append any kinds it is missing. Kinds with no widgets stay put.
    pub fn resolve_container_order(&mut self, available: &[WidgetKind]) -> &[WidgetKind] {
        let before = self.container_order.len();
        for kind in available {
            if !self.container_order.contains(kind) {
                self.container_order.push(*kind);
            }
        }
        if self.container_order.len() != before {
            debug!(order = ?self.container_order, "container order extended");
            self.save_container_order();
        }
        &self.container_order
    }

    /// Move one container next to another. Local only.
    pub fn handle_container_reorder(
        &mut self,
        dragged: WidgetKind,
        target: WidgetKind,
        position: DropPosition,
    ) -> ReorderOutcome {
        if dragged == target {
            warn!(kind = %dragged, "container dropped onto itself");
            return ReorderOutcome::Rejected(RejectReason::SameContainer);
        }
        for kind in [dragged, target] {
            if !self.container_order.contains(&kind) {
                warn!(%kind, order = ?self.container_order, "container kind not in display order");
                return ReorderOutcome::Rejected(RejectReason::UnknownContainer(kind));
            }
        }

        move_relative(&mut self.container_order, &dragged, &target, position);
        info!(%dragged, %target, %position, order = ?self.container_order, "reordered containers");
        self.save_container_order();
        self.render();
        ReorderOutcome::Persisted
    }

    /// Container drag gesture. Ignored outside edit mode.
    pub fn drop_container(&mut self, dragged: WidgetKind, target: WidgetKind, position: DropPosition) -> ReorderOutcome {
        if !self.edit_mode.is_enabled() {
            return ReorderOutcome::Rejected(RejectReason::EditModeDisabled);
        }
        self.handle_container_reorder(dragged, target, position)
    }

    fn save_container_order(&self) {
        ui_store::save_json(&self.store, CONTAINER_ORDER_KEY, &self.container_order);
    }

    // =========================================================================
    // WIDGET ORDER
    // =========================================================================

    /// Move one widget next to another of the same kind and persist dense
    /// positions for that kind.
    pub async fn handle_widget_reorder(
        &mut self,
        dragged_id: Uuid,
        target_id: Uuid,
        position: DropPosition,
    ) -> ReorderOutcome {
        if dragged_id == target_id {
            warn!(%dragged_id, "widget dropped onto itself");
            return ReorderOutcome::Rejected(RejectReason::SameWidget);
        }
        let Some(dragged_kind) = self.widget(dragged_id).map(|w| w.kind) else {
            warn!(%dragged_id, "dragged widget not found");
            return ReorderOutcome::Rejected(RejectReason::UnknownWidget(dragged_id));
        };
        let Some(target_kind) = self.widget(target_id).map(|w| w.kind) else {
            warn!(%target_id, "target widget not found");
            return ReorderOutcome::Rejected(RejectReason::UnknownWidget(target_id));
        };
        if dragged_kind != target_kind {
            warn!(%dragged_id, %target_id, dragged = %dragged_kind, target = %target_kind, "cannot move widget across kinds");
            return ReorderOutcome::Rejected(RejectReason::KindMismatch { dragged: dragged_kind, target: target_kind });
        }

        let mut ordered_ids = self.ids_by_position(dragged_kind);
        move_relative(&mut ordered_ids, &dragged_id, &target_id, position);
        self.persist_order(dragged_kind, ordered_ids).await
    }

    /// Persist a container's reported order after validating it names
    /// exactly the widgets of that kind.
    pub async fn handle_widgets_reordered(&mut self, kind: WidgetKind, ordered_ids: Vec<Uuid>) -> ReorderOutcome {
        let mut expected = self.ids_by_position(kind);
        let mut reported = ordered_ids.clone();
        expected.sort_unstable();
        reported.sort_unstable();
        if expected != reported {
            warn!(%kind, expected = expected.len(), reported = ordered_ids.len(), "reported order does not match widgets");
            return ReorderOutcome::Rejected(RejectReason::IncompleteOrder(kind));
        }
        self.persist_order(kind, ordered_ids).await
    }

    /// Widget drag gesture, routed to the container holding the target.
    pub async fn drop_widget(&mut self, dragged_id: Uuid, target_id: Uuid, position: DropPosition) -> ReorderOutcome {
        if !self.edit_mode.is_enabled() {
            return ReorderOutcome::Rejected(RejectReason::EditModeDisabled);
        }
        if dragged_id == target_id {
            return ReorderOutcome::Rejected(RejectReason::SameWidget);
        }
        let Some(container) = self.containers.iter_mut().find(|c| c.contains(target_id)) else {
            warn!(%target_id, "drop target not rendered");
            return ReorderOutcome::Rejected(RejectReason::UnknownWidget(target_id));
        };
        match container.drop_widget(dragged_id, target_id, position) {
            Some(event) => self.handle_container_event(event).await,
            None => ReorderOutcome::Rejected(RejectReason::SameWidget),
        }
    }

    async fn handle_container_event(&mut self, event: ContainerEvent) -> ReorderOutcome {
        match event {
            ContainerEvent::WidgetsReordered { kind, ordered_ids } => {
                self.handle_widgets_reordered(kind, ordered_ids).await
            }
            ContainerEvent::WidgetReorderRequested { dragged_id, target_id, position } => {
                self.handle_widget_reorder(dragged_id, target_id, position).await
            }
        }
    }

    fn ids_by_position(&self, kind: WidgetKind) -> Vec<Uuid> {
        let mut same_kind: Vec<&Widget> = self.widgets.iter().filter(|w| w.kind == kind).collect();
        same_kind.sort_by_key(|w| w.position);
        same_kind.into_iter().map(|w| w.id).collect()
    }

    /// Apply dense positions locally, send them all, then reload. A failed
    /// batch puts the pre-batch collection back before reloading, so a failed
    /// reload never leaves the unconfirmed order on screen.
    async fn persist_order(&mut self, kind: WidgetKind, ordered_ids: Vec<Uuid>) -> ReorderOutcome {
        let assignments: Vec<(Uuid, u32)> = ordered_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, u32::try_from(index).unwrap_or(u32::MAX)))
            .collect();

        let confirmed = self.widgets.clone();
        for widget in &mut self.widgets {
            if let Some((_, position)) = assignments.iter().find(|(id, _)| *id == widget.id) {
                widget.position = *position;
            }
        }
        self.render();

        let backend = &self.backend;
        let results = join_all(
            assignments
                .iter()
                .map(|(id, position)| backend.update_position(*id, *position)),
        )
        .await;

        let failures: Vec<String> = results.into_iter().filter_map(Result::err).map(|e| e.to_string()).collect();
        let outcome = if failures.is_empty() {
            info!(%kind, count = assignments.len(), "persisted widget order");
            ReorderOutcome::Persisted
        } else {
            warn!(%kind, failed = failures.len(), total = assignments.len(), first_error = %failures[0], "position update failed");
            self.notices.push(Notice::new("Failed to save widget order. Reloading."));
            self.widgets = confirmed;
            self.render();
            ReorderOutcome::Failed
        };

        self.load().await;
        outcome
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Single entry point for consumed events. Reorder inputs return their
    /// outcome.
    pub async fn dispatch(&mut self, input: GridInput) -> Option<ReorderOutcome> {
        match input {
            GridInput::WidgetDeleted(widget_id) => {
                self.apply_widget_deleted(widget_id);
                None
            }
            GridInput::WidgetUpdated { id, properties } => {
                self.apply_widget_updated(id, properties);
                None
            }
            GridInput::ContainerReorderRequested { dragged, target, position } => {
                Some(self.handle_container_reorder(dragged, target, position))
            }
            GridInput::Container(event) => Some(self.handle_container_event(event).await),
            GridInput::HomepageChanged => {
                self.refresh().await;
                None
            }
        }
    }

    /// Drop a widget locally and re-render. No reload.
    fn apply_widget_deleted(&mut self, widget_id: Uuid) {
        let before = self.widgets.len();
        self.widgets.retain(|w| w.id != widget_id);
        if self.widgets.len() == before {
            debug!(%widget_id, "deleted widget was not loaded");
        }
        self.render();
    }

    /// Patch properties in place. No reload, position untouched.
    fn apply_widget_updated(&mut self, widget_id: Uuid, properties: Properties) {
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id == widget_id) else {
            debug!(%widget_id, "updated widget was not loaded");
            return;
        };
        widget.properties = properties;
        self.render();
    }

    // =========================================================================
    // EDITOR FLOWS
    // =========================================================================

    /// Create through the backend, announce it, and reload.
    pub async fn create_widget(&mut self, request: NewWidget) -> Option<Widget> {
        match self.backend.create(request).await {
            Ok(widget) => {
                info!(widget_id = %widget.id, kind = %widget.kind, "widget created");
                self.events.push(GridEvent::WidgetCreated(widget.clone()));
                self.load().await;
                Some(widget)
            }
            Err(e) => {
                warn!(error = %e, "create widget failed");
                self.notices.push(Notice::new(format!("Failed to create widget: {e}")));
                None
            }
        }
    }

    /// Replace a widget's properties through the backend, then patch the
    /// local copy.
    pub async fn update_widget(&mut self, widget_id: Uuid, properties: Properties) -> bool {
        match self.backend.update(widget_id, properties).await {
            Ok(widget) => {
                self.apply_widget_updated(widget.id, widget.properties);
                true
            }
            Err(e) => {
                warn!(%widget_id, error = %e, "update widget failed");
                self.notices.push(Notice::new(format!("Failed to update widget: {e}")));
                false
            }
        }
    }

    /// Delete through the backend, then remove locally.
    pub async fn delete_widget(&mut self, widget_id: Uuid) -> bool {
        match self.backend.delete(widget_id).await {
            Ok(()) => {
                self.apply_widget_deleted(widget_id);
                true
            }
            Err(e) => {
                warn!(%widget_id, error = %e, "delete widget failed");
                self.notices.push(Notice::new(format!("Failed to delete widget: {e}")));
                false
            }
        }
    }

    pub fn request_add_widget(&mut self) {
        self.events.push(GridEvent::AddWidgetRequested);
    }

    /// The active homepage changed: tell the shell and reload.
    pub async fn homepage_changed(&mut self) {
        self.events.push(GridEvent::HomepageChanged);
        self.refresh().await;
    }

    // =========================================================================
    // RENDER
    // =========================================================================

    fn render(&mut self) {
        let groups: Vec<(WidgetKind, Vec<Widget>)> = group_by_type(&self.widgets)
            .into_iter()
            .map(|(kind, group)| (kind, group.into_iter().cloned().collect()))
            .collect();
        let available: Vec<WidgetKind> = groups.iter().map(|(kind, _)| *kind).collect();
        self.resolve_container_order(&available);

        let mut containers = Vec::with_capacity(groups.len());
        for kind in &self.container_order {
            let Some((_, group)) = groups.iter().find(|(k, _)| k == kind) else {
                continue;
            };
            let mut sorted = group.clone();
            sorted.sort_by_key(|w| w.position);
            let mut container = Container::new(*kind, self.edit_mode.clone());
            for widget in sorted {
                container.add_widget(widget);
            }
            containers.push(container);
        }
        self.containers = containers;
    }
}

fn load_container_order(store: &impl UiStore) -> Vec<WidgetKind> {
    let Some(tags) = ui_store::load_json::<Vec<String>>(store, CONTAINER_ORDER_KEY) else {
        return Vec::new();
    };
    let mut order = Vec::with_capacity(tags.len());
    for tag in tags {
        match WidgetKind::parse(&tag) {
            Some(kind) if !order.contains(&kind) => order.push(kind),
            Some(_) => {}
            None => debug!(%tag, "dropping unknown container kind"),
        }
    }
    order
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "grid_test.rs"]
mod tests;
