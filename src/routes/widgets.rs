//! Widget CRUD routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiError, DeletedResponse};
use crate::services::widget::{self, WidgetError};
use crate::state::AppState;
use crate::widget::{NewWidget, Properties, Widget};

#[derive(Debug, Deserialize)]
pub struct UpdateWidgetBody {
    pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePositionBody {
    pub position: u32,
}

/// `GET /api/widgets` — widgets on the default homepage, by position.
pub async fn list_widgets(State(state): State<AppState>) -> Result<Json<Vec<Widget>>, ApiError> {
    let widgets = widget::list_widgets(&state).await?;
    Ok(Json(widgets))
}

/// `POST /api/widgets` — create a widget.
pub async fn create_widget(
    State(state): State<AppState>,
    Json(body): Json<NewWidget>,
) -> Result<(StatusCode, Json<Widget>), ApiError> {
    let created = widget::create_widget(&state, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/widgets/:id` — fetch one widget.
pub async fn get_widget(State(state): State<AppState>, Path(widget_id): Path<Uuid>) -> Result<Json<Widget>, ApiError> {
    Ok(Json(widget::get_widget(&state, widget_id).await?))
}

/// `PUT /api/widgets/:id` — replace properties.
pub async fn update_widget(
    State(state): State<AppState>,
    Path(widget_id): Path<Uuid>,
    Json(body): Json<UpdateWidgetBody>,
) -> Result<Json<Widget>, ApiError> {
    Ok(Json(widget::update_properties(&state, widget_id, body.properties).await?))
}

/// `PATCH /api/widgets/:id/position` — set the sort key.
pub async fn update_position(
    State(state): State<AppState>,
    Path(widget_id): Path<Uuid>,
    Json(body): Json<UpdatePositionBody>,
) -> Result<Json<Widget>, ApiError> {
    Ok(Json(widget::update_position(&state, widget_id, body.position).await?))
}

/// `DELETE /api/widgets/:id` — delete a widget.
pub async fn delete_widget(
    State(state): State<AppState>,
    Path(widget_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    widget::delete_widget(&state, widget_id).await?;
    Ok(Json(DeletedResponse::new(widget_id)))
}

pub(crate) fn widget_error_to_status(err: &WidgetError) -> StatusCode {
    match err {
        WidgetError::NotFound(_) => StatusCode::NOT_FOUND,
        WidgetError::NoHomepage | WidgetError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<WidgetError> for ApiError {
    fn from(err: WidgetError) -> Self {
        Self::new(widget_error_to_status(&err), err.to_string())
    }
}

#[cfg(test)]
#[path = "widgets_test.rs"]
mod tests;
