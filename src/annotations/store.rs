//! SQLite storage for annotations
//!
//! Durable CRUD for annotation records, keyed by excerpt. The repository
//! assigns ids (autoincrement), so in-memory state is only ever updated
//! after a row exists.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

use super::types::{Annotation, TextRange};

/// Repository for annotation persistence
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the annotations table
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS annotations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                excerpt_id INTEGER NOT NULL REFERENCES excerpts(id),
                start_index INTEGER NOT NULL,
                end_index INTEGER NOT NULL,
                selected_text TEXT NOT NULL,
                comment TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_annotations_excerpt ON annotations(excerpt_id);
            CREATE INDEX IF NOT EXISTS idx_annotations_position
                ON annotations(excerpt_id, start_index);
            "#,
        )
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Persist a new annotation and return the stored record.
    pub async fn create(
        &self,
        excerpt_id: i64,
        range: TextRange,
        selected_text: &str,
        comment: &str,
    ) -> Result<Annotation> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO annotations (excerpt_id, start_index, end_index, selected_text, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(excerpt_id)
        .bind(range.start as i64)
        .bind(range.end as i64)
        .bind(selected_text)
        .bind(comment)
        .bind(&now)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal("failed to fetch created annotation".to_string()))
    }

    /// Get an annotation by id
    pub async fn get(&self, id: i64) -> Result<Option<Annotation>> {
        let row = sqlx::query_as::<_, AnnotationRow>(
            r#"
            SELECT id, excerpt_id, start_index, end_index, selected_text, comment, created_at
            FROM annotations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(AnnotationRow::into_annotation).transpose()
    }

    /// All annotations for an excerpt, by position. Ids break ties so the
    /// order is deterministic.
    pub async fn list_by_excerpt(&self, excerpt_id: i64) -> Result<Vec<Annotation>> {
        let rows = sqlx::query_as::<_, AnnotationRow>(
            r#"
            SELECT id, excerpt_id, start_index, end_index, selected_text, comment, created_at
            FROM annotations
            WHERE excerpt_id = ?
            ORDER BY start_index ASC, id ASC
            "#,
        )
        .bind(excerpt_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AnnotationRow::into_annotation).collect()
    }

    /// Replace an annotation's comment; offsets never change here.
    pub async fn update_comment(&self, id: i64, comment: &str) -> Result<Option<Annotation>> {
        let result = sqlx::query("UPDATE annotations SET comment = ? WHERE id = ?")
            .bind(comment)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Delete an annotation
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all annotations for an excerpt
    pub async fn delete_for_excerpt(&self, excerpt_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM annotations WHERE excerpt_id = ?")
            .bind(excerpt_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count annotations for an excerpt
    pub async fn count_for_excerpt(&self, excerpt_id: i64) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM annotations WHERE excerpt_id = ?")
            .bind(excerpt_id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.0)
    }
}

/// Internal row type for SQLite queries
#[derive(sqlx::FromRow)]
struct AnnotationRow {
    id: i64,
    excerpt_id: i64,
    start_index: i64,
    end_index: i64,
    selected_text: String,
    comment: String,
    created_at: String,
}

impl AnnotationRow {
    fn into_annotation(self) -> Result<Annotation> {
        let start = usize::try_from(self.start_index)
            .map_err(|_| AppError::Internal(format!("negative start_index on row {}", self.id)))?;
        let end = usize::try_from(self.end_index)
            .map_err(|_| AppError::Internal(format!("negative end_index on row {}", self.id)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AppError::Internal(format!("bad created_at on row {}: {}", self.id, e)))?
            .with_timezone(&Utc);

        Ok(Annotation {
            id: self.id,
            excerpt_id: self.excerpt_id,
            start,
            end,
            selected_text: self.selected_text,
            comment: self.comment,
            created_at,
        })
    }
}
