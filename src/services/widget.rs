//! Widget service — CRUD and position updates on the default homepage.
//!
//! DESIGN
//! ======
//! Property updates and position updates are separate operations and never
//! touch each other's fields; both refresh `updated_at`. Positions are
//! plain sort keys here: the service never renumbers, it stores whatever
//! the client sends. Dense renumbering is the grid client's job.

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;
use crate::storage::{StorageData, StorageError, StoredWidget};
use crate::widget::{NewWidget, Properties, Widget, WidgetKind};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("widget not found: {0}")]
    NotFound(Uuid),
    #[error("no default homepage")]
    NoHomepage,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// READ
// =============================================================================

/// List widgets on the default homepage, ascending by position. Ties keep
/// creation order.
///
/// # Errors
///
/// Returns `NoHomepage` if the store has no default homepage.
pub async fn list_widgets(state: &AppState) -> Result<Vec<Widget>, WidgetError> {
    let store = state.store.read().await;
    let homepage_id = store.data().default_homepage_id().ok_or(WidgetError::NoHomepage)?;

    let mut rows: Vec<&StoredWidget> = store
        .data()
        .widgets
        .iter()
        .filter(|w| w.homepage_id == homepage_id)
        .collect();
    rows.sort_by_key(|w| (w.position, w.created_at));
    Ok(rows.into_iter().map(StoredWidget::to_widget).collect())
}

/// Fetch one widget on the default homepage by id.
///
/// # Errors
///
/// Returns `NotFound` if no widget on the default homepage has that id.
pub async fn get_widget(state: &AppState, widget_id: Uuid) -> Result<Widget, WidgetError> {
    let store = state.store.read().await;
    let homepage_id = store.data().default_homepage_id().ok_or(WidgetError::NoHomepage)?;
    store
        .data()
        .widgets
        .iter()
        .find(|w| w.id == widget_id && w.homepage_id == homepage_id)
        .map(StoredWidget::to_widget)
        .ok_or(WidgetError::NotFound(widget_id))
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Create a widget on the default homepage. Without an explicit position it
/// goes after the existing widgets of its kind.
///
/// # Errors
///
/// Returns `NoHomepage` or a storage error.
pub async fn create_widget(state: &AppState, request: NewWidget) -> Result<Widget, WidgetError> {
    let mut store = state.store.write().await;
    let widget = store.transact(|data| {
        let homepage_id = data.default_homepage_id().ok_or(WidgetError::NoHomepage)?;
        let position = match request.position {
            Some(position) => position,
            None => next_position(data, homepage_id, request.kind),
        };
        let now = OffsetDateTime::now_utc();
        let row = StoredWidget {
            id: Uuid::new_v4(),
            homepage_id,
            kind: request.kind,
            position,
            properties: request.properties,
            created_at: now,
            updated_at: now,
        };
        let widget = row.to_widget();
        data.widgets.push(row);
        Ok::<_, WidgetError>(widget)
    })?;

    info!(widget_id = %widget.id, kind = %widget.kind, position = widget.position, "created widget");
    Ok(widget)
}

fn next_position(data: &StorageData, homepage_id: Uuid, kind: WidgetKind) -> u32 {
    let count = data
        .widgets
        .iter()
        .filter(|w| w.homepage_id == homepage_id && w.kind == kind)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Replace a widget's properties. Position is left untouched.
///
/// # Errors
///
/// Returns `NotFound` or a storage error.
pub async fn update_properties(
    state: &AppState,
    widget_id: Uuid,
    properties: Properties,
) -> Result<Widget, WidgetError> {
    let widget = mutate_widget(state, widget_id, |row| row.properties = properties).await?;
    info!(%widget_id, "updated widget properties");
    Ok(widget)
}

/// Move a widget to a new position. Properties are left untouched.
///
/// # Errors
///
/// Returns `NotFound` or a storage error.
pub async fn update_position(state: &AppState, widget_id: Uuid, position: u32) -> Result<Widget, WidgetError> {
    let mut old_position = None;
    let widget = mutate_widget(state, widget_id, |row| {
        old_position = Some(row.position);
        row.position = position;
    })
    .await?;
    info!(%widget_id, old = ?old_position, new = position, "updated widget position");
    Ok(widget)
}

/// Delete a widget from the default homepage.
///
/// # Errors
///
/// Returns `NotFound` or a storage error.
pub async fn delete_widget(state: &AppState, widget_id: Uuid) -> Result<(), WidgetError> {
    let mut store = state.store.write().await;
    store.transact(|data| {
        let homepage_id = data.default_homepage_id().ok_or(WidgetError::NoHomepage)?;
        let before = data.widgets.len();
        data.widgets.retain(|w| !(w.id == widget_id && w.homepage_id == homepage_id));
        if data.widgets.len() == before {
            return Err(WidgetError::NotFound(widget_id));
        }
        Ok(())
    })?;
    info!(%widget_id, "deleted widget");
    Ok(())
}

async fn mutate_widget(
    state: &AppState,
    widget_id: Uuid,
    apply: impl FnOnce(&mut StoredWidget),
) -> Result<Widget, WidgetError> {
    let mut store = state.store.write().await;
    store.transact(|data| {
        let homepage_id = data.default_homepage_id().ok_or(WidgetError::NoHomepage)?;
        let row = data
            .widgets
            .iter_mut()
            .find(|w| w.id == widget_id && w.homepage_id == homepage_id)
            .ok_or(WidgetError::NotFound(widget_id))?;
        apply(row);
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.to_widget())
    })
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
