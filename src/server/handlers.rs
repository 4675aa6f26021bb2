use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::model::Task;
use crate::store::StoreError;

use super::AppState;

/// API failure taxonomy: blank text → 400, unknown id → 404, anything the
/// store reports → 500. All serialize as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Task text required")]
    TextRequired,
    #[error("Task not found")]
    NotFound,
    #[error("{0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::TextRequired => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct TaskText {
    pub text: String,
}

#[derive(Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

/// GET /api/tasks — full list, newest first.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.store.lock().list_all()?;
    Ok(Json(tasks))
}

/// POST /api/tasks — create from `{text}`; text is trimmed and must be
/// non-empty.
pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<TaskText>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(ApiError::TextRequired);
    }
    let task = state.store.lock().insert(text)?;
    debug!(id = task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id} — replace the text. Unlike create, the text is stored
/// as sent, untrimmed and unvalidated; clients trim before calling.
pub async fn edit_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TaskText>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.lock().update_text(id, &body.text)?;
    debug!(id, "edited task");
    Ok(Json(task))
}

/// PUT /api/tasks/{id}/toggle — read the row, write back the negation, return
/// the refreshed row. Two store round trips; with a single client there is no
/// competing writer between them.
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    let store = state.store.lock();
    let current = store.get(id)?;
    let task = store.update_completed(id, !current.completed)?;
    debug!(id, completed = task.completed, "toggled task");
    Ok(Json(task))
}

/// DELETE /api/tasks/{id} — permanent removal, no soft delete.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, ApiError> {
    state.store.lock().delete(id)?;
    debug!(id, "deleted task");
    Ok(Json(Deleted { message: "Deleted" }))
}
