//! Excerpt editing session
//!
//! One session owns one excerpt's text and its interval index for the
//! duration of an edit. The index is rebuilt from the store on load (with
//! full re-verification) and mutated only after the store has confirmed
//! the matching write, so in-memory state never runs ahead of durable
//! state. A store failure therefore leaves the session exactly as it was.

use sqlx::SqlitePool;

use crate::error::{AppError, Result};
use crate::excerpts::{Excerpt, ExcerptRepository};

use super::index::IntervalIndex;
use super::resolver;
use super::segment::{segment, Segment};
use super::store::AnnotationRepository;
use super::types::{Annotation, AnnotationDraft, AnnotationError, TextRange};

pub struct ExcerptSession<'a> {
    excerpt: Excerpt,
    index: IntervalIndex,
    store: AnnotationRepository<'a>,
}

impl<'a> ExcerptSession<'a> {
    /// Open a session for an excerpt, rebuilding its interval index from
    /// the store.
    ///
    /// Stored records that no longer match the excerpt text are a sign of
    /// store corruption, not a user mistake, and surface as an internal
    /// error.
    pub async fn load(pool: &'a SqlitePool, excerpt_id: i64) -> Result<Self> {
        let excerpt = ExcerptRepository::new(pool)
            .get(excerpt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("excerpt {} not found", excerpt_id)))?;

        let store = AnnotationRepository::new(pool);
        let records = store.list_by_excerpt(excerpt_id).await?;
        let index = IntervalIndex::from_records(&excerpt.content, records).map_err(|e| {
            AppError::Internal(format!(
                "stored annotations for excerpt {} failed re-verification: {}",
                excerpt_id, e
            ))
        })?;

        Ok(Self {
            excerpt,
            index,
            store,
        })
    }

    pub fn excerpt(&self) -> &Excerpt {
        &self.excerpt
    }

    /// Current annotations, sorted by start offset.
    pub fn annotations(&self) -> &[Annotation] {
        self.index.list()
    }

    /// Partition the excerpt text against the current annotation set.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        segment(&self.excerpt.content, self.index.list())
    }

    /// Create an annotation from a user selection.
    ///
    /// The draft's offsets, when present, are authoritative and must
    /// address the trimmed selection; without offsets the selection is
    /// located by first occurrence. The range is validated against the
    /// index before the store write, and the index is only updated once
    /// the store has confirmed the row.
    pub async fn annotate(&mut self, draft: &AnnotationDraft) -> Result<Annotation> {
        let selection = draft.selected_text.trim();
        let text = &self.excerpt.content;

        let range = match (draft.start_index, draft.end_index) {
            (Some(start), Some(end)) => {
                resolver::resolve_at(text, selection, TextRange::new(start, end))?
            }
            (None, None) => resolver::resolve(text, selection)?,
            _ => return Err(AnnotationError::IncompleteRange.into()),
        };
        self.index.check_range(range)?;

        let record = self
            .store
            .create(self.excerpt.id, range, selection, &draft.comment)
            .await?;
        self.index.insert(record.clone())?;

        Ok(record)
    }

    /// Replace the comment of an existing annotation.
    pub async fn update_comment(&mut self, id: i64, comment: &str) -> Result<Annotation> {
        if self.index.get(id).is_none() {
            return Err(AnnotationError::NotFound(id).into());
        }

        let updated = self
            .store
            .update_comment(id, comment)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("annotation {} vanished from the store", id))
            })?;
        self.index.update_comment(id, comment)?;

        Ok(updated)
    }

    /// Delete an annotation.
    pub async fn remove(&mut self, id: i64) -> Result<()> {
        if self.index.get(id).is_none() {
            return Err(AnnotationError::NotFound(id).into());
        }

        if !self.store.delete(id).await? {
            return Err(AppError::Internal(format!(
                "annotation {} vanished from the store",
                id
            )));
        }
        self.index.remove(id)?;

        Ok(())
    }
}
