//! Tag repository
//!
//! Database operations for tags and their photo/video associations.
//! Tag names are stored lowercase; `get_or_create` matches
//! case-insensitively so every spelling reuses one row.

use crate::models::Tag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Find a tag by name (case-insensitive) or create it.
    ///
    /// New tags are stored with the lowercased name.
    async fn get_or_create(&self, name: &str) -> Result<Tag>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Associate a tag with a photo (no-op if already linked)
    async fn attach_to_photo(&self, photo_id: i64, tag_id: i64) -> Result<()>;

    /// Associate a tag with a video (no-op if already linked)
    async fn attach_to_video(&self, video_id: i64, tag_id: i64) -> Result<()>;

    /// List tags attached to a photo, by name
    async fn list_for_photo(&self, photo_id: i64) -> Result<Vec<Tag>>;

    /// List tags attached to a video, by name
    async fn list_for_video(&self, video_id: i64) -> Result<Vec<Tag>>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: SqlitePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn get_or_create(&self, name: &str) -> Result<Tag> {
        let normalized = name.trim().to_lowercase();

        let existing = sqlx::query(
            r#"
            SELECT id, name, created_at
            FROM tags
            WHERE LOWER(name) = ?
            "#,
        )
        .bind(&normalized)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up tag")?;

        if let Some(row) = existing {
            return row_to_tag(&row);
        }

        let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
            .bind(&normalized)
            .execute(&self.pool)
            .await
            .context("Failed to create tag")?;

        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await
            .context("Failed to fetch created tag")?;

        row_to_tag(&row)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_tag(&row)?)),
            None => Ok(None),
        }
    }

    async fn attach_to_photo(&self, photo_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO photo_tags (photo_id, tag_id) VALUES (?, ?)")
            .bind(photo_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .context("Failed to attach tag to photo")?;

        Ok(())
    }

    async fn attach_to_video(&self, video_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO video_tags (video_id, tag_id) VALUES (?, ?)")
            .bind(video_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .context("Failed to attach tag to video")?;

        Ok(())
    }

    async fn list_for_photo(&self, photo_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM tags t
            JOIN photo_tags pt ON pt.tag_id = t.id
            WHERE pt.photo_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tags for photo")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn list_for_video(&self, video_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM tags t
            JOIN video_tags vt ON vt.tag_id = t.id
            WHERE vt.video_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tags for video")?;

        rows.iter().map(row_to_tag).collect()
    }
}

fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}
