//! Album repository
//!
//! Database operations for albums. Visibility scoping lives here so
//! every listing path applies the same rule: public albums for anyone,
//! private albums only for their owner, everything for admins.

use crate::models::{Album, AlbumVisibility};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Album repository trait
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Create a new album, returning it with the assigned ID
    async fn create(&self, album: &Album) -> Result<Album>;

    /// Get album by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Album>>;

    /// Delete an album (dependent rows cascade)
    async fn delete(&self, id: i64) -> Result<()>;

    /// List albums visible to the given viewer, newest first.
    ///
    /// Anonymous viewers see public albums only; authenticated viewers
    /// additionally see their own private albums; admins see everything.
    async fn list_visible(&self, viewer_id: Option<i64>, is_admin: bool) -> Result<Vec<Album>>;

    /// List albums owned by a user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Album>>;

    /// Count all albums
    async fn count(&self) -> Result<i64>;

    /// Count albums owned by a user
    async fn count_by_user(&self, user_id: i64) -> Result<i64>;
}

/// SQLx-based album repository implementation
pub struct SqlxAlbumRepository {
    pool: SqlitePool,
}

impl SqlxAlbumRepository {
    /// Create a new SQLx album repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn AlbumRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AlbumRepository for SqlxAlbumRepository {
    async fn create(&self, album: &Album) -> Result<Album> {
        let result = sqlx::query(
            r#"
            INSERT INTO albums (title, description, visibility, user_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&album.title)
        .bind(&album.description)
        .bind(album.visibility.to_string())
        .bind(album.user_id)
        .bind(album.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create album")?;

        let mut created = album.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Album>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, visibility, user_id, created_at
            FROM albums
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get album by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_album(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM albums WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete album")?;

        Ok(())
    }

    async fn list_visible(&self, viewer_id: Option<i64>, is_admin: bool) -> Result<Vec<Album>> {
        // `user_id = NULL` never matches, which is the anonymous case
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, visibility, user_id, created_at
            FROM albums
            WHERE ? OR visibility = 'public' OR user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(is_admin)
        .bind(viewer_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list visible albums")?;

        rows.iter().map(row_to_album).collect()
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Album>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, visibility, user_id, created_at
            FROM albums
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list albums by user")?;

        rows.iter().map(row_to_album).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM albums")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count albums")?;

        Ok(row.get("count"))
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM albums WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count albums by user")?;

        Ok(row.get("count"))
    }
}

fn row_to_album(row: &sqlx::sqlite::SqliteRow) -> Result<Album> {
    let visibility_str: String = row.get("visibility");
    Ok(Album {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        visibility: AlbumVisibility::from_str(&visibility_str)?,
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    })
}
