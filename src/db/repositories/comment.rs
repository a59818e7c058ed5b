//! Comment repository
//!
//! Photo comments live in `comments`, video comments in
//! `video_comments`. Both surface as [`Comment`] with the matching
//! target field set.

use crate::models::{Comment, CommentWithAuthor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a comment on a photo
    async fn create_for_photo(&self, user_id: i64, photo_id: i64, body: &str) -> Result<Comment>;

    /// Create a comment on a video
    async fn create_for_video(&self, user_id: i64, video_id: i64, body: &str) -> Result<Comment>;

    /// Get a photo comment by ID
    async fn get_photo_comment(&self, id: i64) -> Result<Option<Comment>>;

    /// Get a video comment by ID
    async fn get_video_comment(&self, id: i64) -> Result<Option<Comment>>;

    /// List a photo's comments with author names, oldest first
    async fn list_for_photo(&self, photo_id: i64) -> Result<Vec<CommentWithAuthor>>;

    /// List a video's comments with author names, oldest first
    async fn list_for_video(&self, video_id: i64) -> Result<Vec<CommentWithAuthor>>;

    /// Delete a photo comment
    async fn delete_photo_comment(&self, id: i64) -> Result<()>;

    /// Delete a video comment
    async fn delete_video_comment(&self, id: i64) -> Result<()>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: SqlitePool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create_for_photo(&self, user_id: i64, photo_id: i64, body: &str) -> Result<Comment> {
        let result = sqlx::query(
            "INSERT INTO comments (body, user_id, photo_id) VALUES (?, ?, ?)",
        )
        .bind(body)
        .bind(user_id)
        .bind(photo_id)
        .execute(&self.pool)
        .await
        .context("Failed to create photo comment")?;

        self.get_photo_comment(result.last_insert_rowid())
            .await?
            .context("Created photo comment not found")
    }

    async fn create_for_video(&self, user_id: i64, video_id: i64, body: &str) -> Result<Comment> {
        let result = sqlx::query(
            "INSERT INTO video_comments (body, user_id, video_id) VALUES (?, ?, ?)",
        )
        .bind(body)
        .bind(user_id)
        .bind(video_id)
        .execute(&self.pool)
        .await
        .context("Failed to create video comment")?;

        self.get_video_comment(result.last_insert_rowid())
            .await?
            .context("Created video comment not found")
    }

    async fn get_photo_comment(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query(
            "SELECT id, body, user_id, photo_id, created_at FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get photo comment")?;

        Ok(row.map(|row| Comment {
            id: row.get("id"),
            body: row.get("body"),
            user_id: row.get("user_id"),
            photo_id: row.get("photo_id"),
            video_id: None,
            created_at: row.get("created_at"),
        }))
    }

    async fn get_video_comment(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query(
            "SELECT id, body, user_id, video_id, created_at FROM video_comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get video comment")?;

        Ok(row.map(|row| Comment {
            id: row.get("id"),
            body: row.get("body"),
            user_id: row.get("user_id"),
            photo_id: None,
            video_id: row.get("video_id"),
            created_at: row.get("created_at"),
        }))
    }

    async fn list_for_photo(&self, photo_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.body, c.user_id, c.photo_id, c.created_at, u.full_name
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.photo_id = ?
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list photo comments")?;

        Ok(rows
            .iter()
            .map(|row| CommentWithAuthor {
                comment: Comment {
                    id: row.get("id"),
                    body: row.get("body"),
                    user_id: row.get("user_id"),
                    photo_id: row.get("photo_id"),
                    video_id: None,
                    created_at: row.get("created_at"),
                },
                author_name: row.get("full_name"),
            })
            .collect())
    }

    async fn list_for_video(&self, video_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.body, c.user_id, c.video_id, c.created_at, u.full_name
            FROM video_comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.video_id = ?
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list video comments")?;

        Ok(rows
            .iter()
            .map(|row| CommentWithAuthor {
                comment: Comment {
                    id: row.get("id"),
                    body: row.get("body"),
                    user_id: row.get("user_id"),
                    photo_id: None,
                    video_id: row.get("video_id"),
                    created_at: row.get("created_at"),
                },
                author_name: row.get("full_name"),
            })
            .collect())
    }

    async fn delete_photo_comment(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete photo comment")?;

        Ok(())
    }

    async fn delete_video_comment(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM video_comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete video comment")?;

        Ok(())
    }
}
