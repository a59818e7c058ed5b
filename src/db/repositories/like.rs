//! Like repository
//!
//! Database operations for photo and video likes. A (user, item) pair is
//! unique at the schema level, which is the only concurrency guard the
//! toggle needs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::MediaKind;

/// Like repository trait, covering both photo and video likes
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Check whether a user has liked a photo
    async fn photo_like_exists(&self, user_id: i64, photo_id: i64) -> Result<bool>;

    /// Create a photo like
    async fn create_photo_like(&self, user_id: i64, photo_id: i64) -> Result<()>;

    /// Delete a photo like
    async fn delete_photo_like(&self, user_id: i64, photo_id: i64) -> Result<()>;

    /// Count likes on a photo
    async fn count_for_photo(&self, photo_id: i64) -> Result<i64>;

    /// Check whether a user has liked a video
    async fn video_like_exists(&self, user_id: i64, video_id: i64) -> Result<bool>;

    /// Create a video like
    async fn create_video_like(&self, user_id: i64, video_id: i64) -> Result<()>;

    /// Delete a video like
    async fn delete_video_like(&self, user_id: i64, video_id: i64) -> Result<()>;

    /// Count likes on a video
    async fn count_for_video(&self, video_id: i64) -> Result<i64>;

    /// All of a user's likes across both kinds, most recently liked first
    async fn list_liked_refs(&self, user_id: i64) -> Result<Vec<(MediaKind, i64)>>;
}

/// SQLx-based like repository implementation
pub struct SqlxLikeRepository {
    pool: SqlitePool,
}

impl SqlxLikeRepository {
    /// Create a new SQLx like repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn LikeRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn photo_like_exists(&self, user_id: i64, photo_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM likes WHERE user_id = ? AND photo_id = ?",
        )
        .bind(user_id)
        .bind(photo_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check photo like")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn create_photo_like(&self, user_id: i64, photo_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO likes (user_id, photo_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(photo_id)
            .execute(&self.pool)
            .await
            .context("Failed to create photo like")?;

        Ok(())
    }

    async fn delete_photo_like(&self, user_id: i64, photo_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM likes WHERE user_id = ? AND photo_id = ?")
            .bind(user_id)
            .bind(photo_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete photo like")?;

        Ok(())
    }

    async fn count_for_photo(&self, photo_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM likes WHERE photo_id = ?")
            .bind(photo_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count photo likes")?;

        Ok(row.get("count"))
    }

    async fn video_like_exists(&self, user_id: i64, video_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM video_likes WHERE user_id = ? AND video_id = ?",
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check video like")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn create_video_like(&self, user_id: i64, video_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO video_likes (user_id, video_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await
            .context("Failed to create video like")?;

        Ok(())
    }

    async fn delete_video_like(&self, user_id: i64, video_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM video_likes WHERE user_id = ? AND video_id = ?")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete video like")?;

        Ok(())
    }

    async fn count_for_video(&self, video_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM video_likes WHERE video_id = ?")
            .bind(video_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count video likes")?;

        Ok(row.get("count"))
    }

    async fn list_liked_refs(&self, user_id: i64) -> Result<Vec<(MediaKind, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT 'photo' AS kind, photo_id AS item_id, created_at FROM likes WHERE user_id = ?
            UNION ALL
            SELECT 'video' AS kind, video_id AS item_id, created_at FROM video_likes WHERE user_id = ?
            ORDER BY created_at DESC, item_id DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list liked items")?;

        Ok(rows
            .iter()
            .map(|row| {
                let kind: String = row.get("kind");
                let kind = if kind == "video" {
                    MediaKind::Video
                } else {
                    MediaKind::Photo
                };
                (kind, row.get("item_id"))
            })
            .collect())
    }
}
