//! Homepage management routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiError, DeletedResponse};
use crate::homepage::{Homepage, NewHomepage};
use crate::services::homepage::{self, HomepageError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenameHomepageBody {
    pub name: String,
}

/// `GET /api/homepages` — all homepages, oldest first.
pub async fn list_homepages(State(state): State<AppState>) -> Result<Json<Vec<Homepage>>, ApiError> {
    Ok(Json(homepage::list_homepages(&state).await?))
}

/// `POST /api/homepages` — create a homepage.
pub async fn create_homepage(
    State(state): State<AppState>,
    Json(body): Json<NewHomepage>,
) -> Result<(StatusCode, Json<Homepage>), ApiError> {
    let created = homepage::create_homepage(&state, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/homepages/:id` — fetch one homepage.
pub async fn get_homepage(
    State(state): State<AppState>,
    Path(homepage_id): Path<Uuid>,
) -> Result<Json<Homepage>, ApiError> {
    Ok(Json(homepage::get_homepage(&state, homepage_id).await?))
}

/// `PUT /api/homepages/:id` — rename.
pub async fn rename_homepage(
    State(state): State<AppState>,
    Path(homepage_id): Path<Uuid>,
    Json(body): Json<RenameHomepageBody>,
) -> Result<Json<Homepage>, ApiError> {
    Ok(Json(homepage::rename_homepage(&state, homepage_id, &body.name).await?))
}

/// `PATCH /api/homepages/:id/default` — make this the default homepage.
pub async fn set_default_homepage(
    State(state): State<AppState>,
    Path(homepage_id): Path<Uuid>,
) -> Result<Json<Homepage>, ApiError> {
    Ok(Json(homepage::set_default_homepage(&state, homepage_id).await?))
}

/// `DELETE /api/homepages/:id` — delete a homepage and its widgets.
pub async fn delete_homepage(
    State(state): State<AppState>,
    Path(homepage_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    homepage::delete_homepage(&state, homepage_id).await?;
    Ok(Json(DeletedResponse::new(homepage_id)))
}

pub(crate) fn homepage_error_to_status(err: &HomepageError) -> StatusCode {
    match err {
        HomepageError::NotFound(_) => StatusCode::NOT_FOUND,
        HomepageError::LastHomepage | HomepageError::EmptyName => StatusCode::BAD_REQUEST,
        HomepageError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<HomepageError> for ApiError {
    fn from(err: HomepageError) -> Self {
        Self::new(homepage_error_to_status(&err), err.to_string())
    }
}

#[cfg(test)]
#[path = "homepages_test.rs"]
mod tests;
