//! Excerpt database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// A canonical body of text users annotate. The content never changes
/// once annotations exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update request body for an excerpt
#[derive(Debug, Clone, Deserialize)]
pub struct ExcerptDraft {
    pub title: String,
    pub content: String,
}

/// Excerpt repository
pub struct ExcerptRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ExcerptRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the excerpts table
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS excerpts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Store a new excerpt and return the record.
    pub async fn create(&self, draft: &ExcerptDraft) -> Result<Excerpt> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO excerpts (title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal("failed to fetch created excerpt".to_string()))
    }

    /// Get an excerpt by id
    pub async fn get(&self, id: i64) -> Result<Option<Excerpt>> {
        let row = sqlx::query_as::<_, ExcerptRow>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM excerpts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ExcerptRow::into_excerpt).transpose()
    }

    /// All excerpts, newest first.
    pub async fn list(&self) -> Result<Vec<Excerpt>> {
        let rows = sqlx::query_as::<_, ExcerptRow>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM excerpts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ExcerptRow::into_excerpt).collect()
    }

    /// Replace an excerpt's title and content. Callers enforce the
    /// content lock for annotated excerpts before getting here.
    pub async fn update(&self, id: i64, draft: &ExcerptDraft) -> Result<Option<Excerpt>> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE excerpts
            SET title = ?, content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&now)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Delete an excerpt together with its annotations.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM annotations WHERE excerpt_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM excerpts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Internal row type for SQLite queries
#[derive(sqlx::FromRow)]
struct ExcerptRow {
    id: i64,
    title: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl ExcerptRow {
    fn into_excerpt(self) -> Result<Excerpt> {
        let created_at = parse_timestamp(&self.created_at, self.id)?;
        let updated_at = parse_timestamp(&self.updated_at, self.id)?;

        Ok(Excerpt {
            id: self.id,
            title: self.title,
            content: self.content,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(value: &str, row_id: i64) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(format!("bad timestamp on excerpt {}: {}", row_id, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{AnnotationRepository, TextRange};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        ExcerptRepository::new(&pool).init().await.unwrap();
        AnnotationRepository::new(&pool).init().await.unwrap();
        pool
    }

    fn draft(title: &str, content: &str) -> ExcerptDraft {
        ExcerptDraft {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = setup_test_db().await;
        let repo = ExcerptRepository::new(&pool);

        let created = repo
            .create(&draft("Fox", "The quick brown fox"))
            .await
            .unwrap();

        let loaded = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Fox");
        assert_eq!(loaded.content, "The quick brown fox");
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let pool = setup_test_db().await;
        let repo = ExcerptRepository::new(&pool);
        assert!(repo.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update() {
        let pool = setup_test_db().await;
        let repo = ExcerptRepository::new(&pool);

        let created = repo.create(&draft("Old", "old text")).await.unwrap();
        let updated = repo
            .update(created.id, &draft("New", "new text"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "new text");
        assert!(repo.update(9999, &draft("x", "y")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_annotations_too() {
        let pool = setup_test_db().await;
        let repo = ExcerptRepository::new(&pool);
        let annotations = AnnotationRepository::new(&pool);

        let excerpt = repo
            .create(&draft("Fox", "The quick brown fox"))
            .await
            .unwrap();
        annotations
            .create(excerpt.id, TextRange::new(4, 9), "quick", "")
            .await
            .unwrap();

        assert!(repo.delete(excerpt.id).await.unwrap());
        assert!(repo.get(excerpt.id).await.unwrap().is_none());
        assert_eq!(annotations.count_for_excerpt(excerpt.id).await.unwrap(), 0);
        assert!(!repo.delete(excerpt.id).await.unwrap());
    }
}
