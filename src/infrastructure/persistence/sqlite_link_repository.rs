//! SQLite implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{StoreError, map_sqlx_error};

#[derive(FromRow)]
struct LinkRow {
    shortpath: String,
    destination: String,
    hits: i64,
    created: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(
            row.shortpath,
            row.destination,
            row.hits,
            DateTime::from_timestamp(row.created, 0).unwrap_or_default(),
        )
    }
}

/// SQLite repository for link storage and retrieval.
///
/// Uses bound parameters for every statement; each mutation is a single-row
/// statement whose affected-row count is checked.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn lookup(&self, key: &str) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT destination FROM shortlinks WHERE shortpath = ?")
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, key))?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn find(&self, key: &str) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT shortpath, destination, hits, created
            FROM shortlinks
            WHERE shortpath = ?
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, key))?;

        Ok(row.map(Link::from))
    }

    async fn create(&self, new_link: NewLink) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO shortlinks (shortpath, destination, hits, created)
            VALUES (?, ?, 0, ?)
            "#,
        )
        .bind(&new_link.key)
        .bind(&new_link.destination)
        .bind(Utc::now().timestamp())
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, &new_link.key))?;

        if result.rows_affected() < 1 {
            return Err(StoreError::WriteFailed {
                operation: "create",
                key: new_link.key,
            });
        }

        Ok(())
    }

    async fn update(&self, key: &str, destination: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE shortlinks SET destination = ? WHERE shortpath = ?")
            .bind(destination)
            .bind(key)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, key))?;

        if result.rows_affected() < 1 {
            return Err(StoreError::NotFound(key.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shortlinks WHERE shortpath = ?")
            .bind(key)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, key))?;

        if result.rows_affected() < 1 {
            return Err(StoreError::NotFound(key.to_string()));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
