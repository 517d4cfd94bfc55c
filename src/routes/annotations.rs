//! Annotation API routes
//!
//! Thin handlers over [`ExcerptSession`]: every mutation opens the
//! owning excerpt's session so the interval invariants are checked
//! against current state before anything is persisted.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::annotations::{Annotation, AnnotationDraft, AnnotationRepository, ExcerptSession};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the annotations router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_annotation))
        .route("/text/:excerpt_id", get(list_for_excerpt))
        .route("/:id", put(update_annotation).delete(delete_annotation))
}

/// Create annotation request
#[derive(Debug, Deserialize)]
pub struct CreateAnnotation {
    pub excerpt_id: i64,
    #[serde(flatten)]
    pub draft: AnnotationDraft,
}

/// Update annotation request; only the comment is mutable
#[derive(Debug, Deserialize)]
pub struct UpdateAnnotation {
    pub comment: String,
}

/// List annotations for an excerpt, sorted by start offset
async fn list_for_excerpt(
    State(state): State<AppState>,
    Path(excerpt_id): Path<i64>,
) -> Result<Json<Vec<Annotation>>> {
    let repo = AnnotationRepository::new(state.db());
    Ok(Json(repo.list_by_excerpt(excerpt_id).await?))
}

/// Create a new annotation from a selection
async fn create_annotation(
    State(state): State<AppState>,
    Json(req): Json<CreateAnnotation>,
) -> Result<(StatusCode, Json<Annotation>)> {
    let mut session = ExcerptSession::load(state.db(), req.excerpt_id).await?;
    let created = session.annotate(&req.draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an annotation's comment
async fn update_annotation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAnnotation>,
) -> Result<Json<Annotation>> {
    let existing = find_annotation(&state, id).await?;
    let mut session = ExcerptSession::load(state.db(), existing.excerpt_id).await?;
    let updated = session.update_comment(id, &req.comment).await?;
    Ok(Json(updated))
}

/// Delete an annotation
async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let existing = find_annotation(&state, id).await?;
    let mut session = ExcerptSession::load(state.db(), existing.excerpt_id).await?;
    session.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_annotation(state: &AppState, id: i64) -> Result<Annotation> {
    AnnotationRepository::new(state.db())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("annotation {} not found", id)))
}
