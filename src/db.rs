//! Database pool setup

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::annotations::AnnotationRepository;
use crate::error::Result;
use crate::excerpts::ExcerptRepository;

/// Open the SQLite pool and make sure the schema exists.
pub async fn create_pool(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    // Excerpts first: annotations reference them
    ExcerptRepository::new(&pool).init().await?;
    AnnotationRepository::new(&pool).init().await?;

    Ok(pool)
}
