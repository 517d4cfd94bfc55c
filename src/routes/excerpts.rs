//! Excerpt API routes
//!
//! Public reads (excerpt lists, single excerpts with their annotations,
//! rendered segments) plus admin-gated writes. Once an excerpt has
//! annotations its content is locked: offsets stored against the old text
//! would silently point at the wrong spans.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::annotations::{Annotation, AnnotationRepository, ExcerptSession, Segment};
use crate::auth::RequireAuth;
use crate::error::{AppError, Result};
use crate::excerpts::{Excerpt, ExcerptDraft, ExcerptRepository};
use crate::state::AppState;

/// Create the excerpts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_excerpts).post(create_excerpt))
        .route(
            "/:id",
            get(get_excerpt).put(update_excerpt).delete(delete_excerpt),
        )
        .route("/:id/segments", get(get_segments))
}

/// An excerpt together with its annotations, sorted by position
#[derive(Serialize)]
pub struct ExcerptWithAnnotations {
    #[serde(flatten)]
    pub excerpt: Excerpt,
    pub annotations: Vec<Annotation>,
}

/// One rendered slice of an excerpt
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentView {
    Plain { text: String },
    Annotated { text: String, annotation: Annotation },
}

impl From<&Segment<'_>> for SegmentView {
    fn from(segment: &Segment<'_>) -> Self {
        match segment {
            Segment::Plain(text) => SegmentView::Plain {
                text: (*text).to_string(),
            },
            Segment::Annotated { text, annotation } => SegmentView::Annotated {
                text: (*text).to_string(),
                annotation: (*annotation).clone(),
            },
        }
    }
}

/// The full partition of an excerpt into plain and annotated segments
#[derive(Serialize)]
pub struct SegmentedExcerpt {
    pub excerpt_id: i64,
    pub title: String,
    pub segments: Vec<SegmentView>,
}

/// List all excerpts, newest first
async fn list_excerpts(State(state): State<AppState>) -> Result<Json<Vec<Excerpt>>> {
    let repo = ExcerptRepository::new(state.db());
    Ok(Json(repo.list().await?))
}

/// Get a single excerpt with its annotations
async fn get_excerpt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExcerptWithAnnotations>> {
    let session = ExcerptSession::load(state.db(), id).await?;
    Ok(Json(ExcerptWithAnnotations {
        annotations: session.annotations().to_vec(),
        excerpt: session.excerpt().clone(),
    }))
}

/// Render an excerpt as an ordered, gapless segment sequence
async fn get_segments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SegmentedExcerpt>> {
    let session = ExcerptSession::load(state.db(), id).await?;
    let segments = session.segments().iter().map(SegmentView::from).collect();

    Ok(Json(SegmentedExcerpt {
        excerpt_id: session.excerpt().id,
        title: session.excerpt().title.clone(),
        segments,
    }))
}

/// Create a new excerpt (admin)
async fn create_excerpt(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Json(draft): Json<ExcerptDraft>,
) -> Result<(StatusCode, Json<Excerpt>)> {
    validate_draft(&draft)?;

    let repo = ExcerptRepository::new(state.db());
    let excerpt = repo.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(excerpt)))
}

/// Update an excerpt (admin). The title can always change; the content is
/// locked once annotations exist.
async fn update_excerpt(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ExcerptDraft>,
) -> Result<Json<Excerpt>> {
    validate_draft(&draft)?;

    let repo = ExcerptRepository::new(state.db());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("excerpt {} not found", id)))?;

    if draft.content != existing.content {
        let annotations = AnnotationRepository::new(state.db());
        let count = annotations.count_for_excerpt(id).await?;
        if count > 0 {
            return Err(AppError::Conflict(format!(
                "excerpt {} has {} annotations; its content can no longer change",
                id, count
            )));
        }
    }

    let updated = repo
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("excerpt {} not found", id)))?;
    Ok(Json(updated))
}

/// Delete an excerpt and its annotations (admin)
async fn delete_excerpt(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let repo = ExcerptRepository::new(state.db());
    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("excerpt {} not found", id)))
    }
}

fn validate_draft(draft: &ExcerptDraft) -> Result<()> {
    if draft.title.trim().is_empty() || draft.content.is_empty() {
        return Err(AppError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }
    Ok(())
}
