//! HTTP surface for the student records service.
//!
//! - `GET /` – Liveness greeting.
//! - `GET /students` – List every record in insertion order.
//! - `POST /students` – Validate and create a record; responds `201` with the stored record.
//! - `GET /students/:id` – Fetch one record.
//! - `PUT /students/:id` – Validate and overwrite a record's fields.
//! - `DELETE /students/:id` – Remove a record.
//! - `GET /students/:id/summary` – Ask the generation runtime for a friendly profile summary.
//!
//! Confirmation and error messages are returned as JSON strings. Generation failures are logged
//! and collapsed into an opaque `500`.

use crate::students::{NewStudent, StoreError, StudentId, StudentRecord, StudentStore};
use crate::summarization::{SummaryClient, SummaryError};
use crate::validation::{ValidationError, validate_student};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Record store owning the student collection.
    pub store: Arc<StudentStore>,
    /// Backend used by the summary route.
    pub summarizer: Arc<dyn SummaryClient>,
}

impl AppState {
    /// Bundle a store and a summary backend into router state.
    pub fn new(store: Arc<StudentStore>, summarizer: Arc<dyn SummaryClient>) -> Self {
        Self { store, summarizer }
    }
}

/// Build the HTTP router exposing the student API surface.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/students/:id/summary", get(summarize_student))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn hello() -> &'static str {
    "Well, hello there!"
}

async fn list_students(State(state): State<AppState>) -> Json<Vec<StudentRecord>> {
    Json(state.store.list().await)
}

async fn get_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StudentRecord>, ApiError> {
    let id = parse_id(&raw_id)?;
    Ok(Json(state.store.get(id).await?))
}

/// Create a record from a validated payload.
async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentRecord>), ApiError> {
    let Json(student) = payload?;
    validate_student(&student)?;
    let record = state.store.create(student).await;
    tracing::info!(id = record.id, "Student created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Overwrite an existing record.
///
/// The id is resolved before the body is looked at, so an unknown id reports `404` even when the
/// payload is also invalid. That lookup is advisory: it and the write take the store lock
/// separately, so a delete landing in between surfaces as `404` from the write itself.
async fn update_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let id = parse_id(&raw_id)?;
    state.store.get(id).await?;
    let Json(student) = payload?;
    validate_student(&student)?;
    state.store.update(id, student).await?;
    tracing::info!(id, "Student updated");
    Ok(Json("student updated"))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    let id = parse_id(&raw_id)?;
    state.store.delete(id).await?;
    tracing::info!(id, "Student deleted");
    Ok(Json("student deleted"))
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

/// Generate a natural-language summary for one record.
///
/// The store lock is released before the upstream call; the record is a snapshot.
async fn summarize_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    let student = state.store.get(id).await?;
    let summary = state
        .summarizer
        .generate_summary(&student)
        .await
        .map_err(|error| {
            tracing::error!(id, %error, "Summary generation failed");
            ApiError::Summary(error)
        })?;
    Ok(Json(SummaryResponse { summary }))
}

fn parse_id(raw: &str) -> Result<StudentId, ApiError> {
    raw.parse().map_err(|_| {
        tracing::warn!(raw_id = raw, "Rejected non-numeric student id");
        ApiError::BadRequest("Invalid student id".into())
    })
}

/// Errors produced by request handlers, rendered as a status code plus a JSON string message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed id, malformed body, or failed field validation.
    #[error("{0}")]
    BadRequest(String),
    /// Referenced record does not exist.
    #[error("Student not found")]
    NotFound,
    /// Summary generation failed; the cause is logged, never returned.
    #[error("Failed to generate summary")]
    Summary(#[source] SummaryError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Summary(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_string())).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(inner: StoreError) -> Self {
        tracing::debug!(%inner, "Lookup missed");
        Self::NotFound
    }
}

impl From<ValidationError> for ApiError {
    fn from(inner: ValidationError) -> Self {
        tracing::warn!(%inner, "Rejected student payload");
        Self::BadRequest(inner.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected malformed request body");
        Self::BadRequest(rejection.body_text())
    }
}
