//! Video repository
//!
//! Mirrors the photo repository, with one deliberate difference: text
//! search matches video captions only, not tags or album titles.

use crate::models::Video;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Video repository trait
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Create a new video, returning it with the assigned ID
    async fn create(&self, video: &Video) -> Result<Video>;

    /// Get video by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Video>>;

    /// Delete a video (likes, comments, tag links cascade)
    async fn delete(&self, id: i64) -> Result<()>;

    /// List videos in an album, newest first
    async fn list_by_album(&self, album_id: i64) -> Result<Vec<Video>>;

    /// List videos uploaded by a user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Video>>;

    /// List videos liked by a user, newest first
    async fn list_liked_by(&self, user_id: i64) -> Result<Vec<Video>>;

    /// List videos visible to the viewer, optionally filtered.
    ///
    /// `q` matches caption substrings only (case-insensitive).
    async fn search_visible(
        &self,
        viewer_id: Option<i64>,
        is_admin: bool,
        q: Option<&str>,
        uploader_id: Option<i64>,
    ) -> Result<Vec<Video>>;

    /// Count all videos
    async fn count(&self) -> Result<i64>;

    /// Count videos uploaded by a user
    async fn count_by_user(&self, user_id: i64) -> Result<i64>;
}

/// SQLx-based video repository implementation
pub struct SqlxVideoRepository {
    pool: SqlitePool,
}

impl SqlxVideoRepository {
    /// Create a new SQLx video repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn VideoRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_COLUMNS: &str = "v.id, v.filename, v.original_name, v.caption, v.album_id, v.user_id, v.created_at";

#[async_trait]
impl VideoRepository for SqlxVideoRepository {
    async fn create(&self, video: &Video) -> Result<Video> {
        let result = sqlx::query(
            r#"
            INSERT INTO videos (filename, original_name, caption, album_id, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&video.filename)
        .bind(&video.original_name)
        .bind(&video.caption)
        .bind(video.album_id)
        .bind(video.user_id)
        .bind(video.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create video")?;

        let mut created = video.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Video>> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, original_name, caption, album_id, user_id, created_at
            FROM videos
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get video by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_video(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete video")?;

        Ok(())
    }

    async fn list_by_album(&self, album_id: i64) -> Result<Vec<Video>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, original_name, caption, album_id, user_id, created_at
            FROM videos
            WHERE album_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list videos by album")?;

        rows.iter().map(row_to_video).collect()
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Video>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, original_name, caption, album_id, user_id, created_at
            FROM videos
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list videos by user")?;

        rows.iter().map(row_to_video).collect()
    }

    async fn list_liked_by(&self, user_id: i64) -> Result<Vec<Video>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM videos v
            JOIN video_likes l ON l.video_id = v.id
            WHERE l.user_id = ?
            ORDER BY v.created_at DESC, v.id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list videos liked by user")?;

        rows.iter().map(row_to_video).collect()
    }

    async fn search_visible(
        &self,
        viewer_id: Option<i64>,
        is_admin: bool,
        q: Option<&str>,
        uploader_id: Option<i64>,
    ) -> Result<Vec<Video>> {
        let pattern = q.map(|q| format!("%{}%", q.to_lowercase()));

        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM videos v
            JOIN albums a ON v.album_id = a.id
            WHERE (? OR a.visibility = 'public' OR a.user_id = ?)
              AND (? IS NULL OR v.user_id = ?)
              AND (? IS NULL OR LOWER(v.caption) LIKE ?)
            ORDER BY v.created_at DESC, v.id DESC
            "#
        ))
        .bind(is_admin)
        .bind(viewer_id)
        .bind(uploader_id)
        .bind(uploader_id)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search visible videos")?;

        rows.iter().map(row_to_video).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM videos")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count videos")?;

        Ok(row.get("count"))
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM videos WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count videos by user")?;

        Ok(row.get("count"))
    }
}

fn row_to_video(row: &sqlx::sqlite::SqliteRow) -> Result<Video> {
    Ok(Video {
        id: row.get("id"),
        filename: row.get("filename"),
        original_name: row.get("original_name"),
        caption: row.get("caption"),
        album_id: row.get("album_id"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    })
}
