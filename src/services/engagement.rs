//! Likes and comments
//!
//! The like toggle and comment lifecycle for photos and videos. The
//! unique (user, item) constraint in the schema is what keeps a
//! double-submitted toggle from creating duplicate likes.

use crate::db::repositories::{CommentRepository, LikeRepository, PhotoRepository, VideoRepository};
use crate::models::{Comment, User};
use crate::services::policy;
use anyhow::Context;
use std::sync::Arc;

/// Error types for engagement operations
#[derive(Debug, thiserror::Error)]
pub enum EngagementServiceError {
    /// Validation error (empty comment body)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Actor is not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Target entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Engagement service for likes and comments
pub struct EngagementService {
    like_repo: Arc<dyn LikeRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    photo_repo: Arc<dyn PhotoRepository>,
    video_repo: Arc<dyn VideoRepository>,
}

impl EngagementService {
    pub fn new(
        like_repo: Arc<dyn LikeRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        photo_repo: Arc<dyn PhotoRepository>,
        video_repo: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            like_repo,
            comment_repo,
            photo_repo,
            video_repo,
        }
    }

    async fn require_photo(&self, photo_id: i64) -> Result<(), EngagementServiceError> {
        self.photo_repo
            .get_by_id(photo_id)
            .await
            .context("Failed to get photo")?
            .ok_or_else(|| {
                EngagementServiceError::NotFound(format!("Photo {} not found", photo_id))
            })?;
        Ok(())
    }

    async fn require_video(&self, video_id: i64) -> Result<(), EngagementServiceError> {
        self.video_repo
            .get_by_id(video_id)
            .await
            .context("Failed to get video")?
            .ok_or_else(|| {
                EngagementServiceError::NotFound(format!("Video {} not found", video_id))
            })?;
        Ok(())
    }

    /// Flip the user's like on a photo.
    ///
    /// Returns the resulting state: true when the photo is now liked.
    pub async fn toggle_photo_like(
        &self,
        user: &User,
        photo_id: i64,
    ) -> Result<bool, EngagementServiceError> {
        self.require_photo(photo_id).await?;

        let exists = self
            .like_repo
            .photo_like_exists(user.id, photo_id)
            .await
            .context("Failed to check like")?;

        if exists {
            self.like_repo
                .delete_photo_like(user.id, photo_id)
                .await
                .context("Failed to remove like")?;
            Ok(false)
        } else {
            self.like_repo
                .create_photo_like(user.id, photo_id)
                .await
                .context("Failed to create like")?;
            Ok(true)
        }
    }

    /// Flip the user's like on a video
    pub async fn toggle_video_like(
        &self,
        user: &User,
        video_id: i64,
    ) -> Result<bool, EngagementServiceError> {
        self.require_video(video_id).await?;

        let exists = self
            .like_repo
            .video_like_exists(user.id, video_id)
            .await
            .context("Failed to check like")?;

        if exists {
            self.like_repo
                .delete_video_like(user.id, video_id)
                .await
                .context("Failed to remove like")?;
            Ok(false)
        } else {
            self.like_repo
                .create_video_like(user.id, video_id)
                .await
                .context("Failed to create like")?;
            Ok(true)
        }
    }

    /// Remove the user's like on a video, whether or not one exists
    pub async fn unlike_video(
        &self,
        user: &User,
        video_id: i64,
    ) -> Result<(), EngagementServiceError> {
        self.require_video(video_id).await?;

        self.like_repo
            .delete_video_like(user.id, video_id)
            .await
            .context("Failed to remove like")?;
        Ok(())
    }

    /// Comment on a photo. The body must be non-blank after trimming.
    pub async fn comment_photo(
        &self,
        user: &User,
        photo_id: i64,
        body: &str,
    ) -> Result<Comment, EngagementServiceError> {
        let body = validated_body(body)?;
        self.require_photo(photo_id).await?;

        let comment = self
            .comment_repo
            .create_for_photo(user.id, photo_id, body)
            .await
            .context("Failed to create comment")?;
        Ok(comment)
    }

    /// Comment on a video
    pub async fn comment_video(
        &self,
        user: &User,
        video_id: i64,
        body: &str,
    ) -> Result<Comment, EngagementServiceError> {
        let body = validated_body(body)?;
        self.require_video(video_id).await?;

        let comment = self
            .comment_repo
            .create_for_video(user.id, video_id, body)
            .await
            .context("Failed to create comment")?;
        Ok(comment)
    }

    /// Delete a photo comment. Author or admin only.
    pub async fn delete_photo_comment(
        &self,
        actor: &User,
        comment_id: i64,
    ) -> Result<(), EngagementServiceError> {
        let comment = self
            .comment_repo
            .get_photo_comment(comment_id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| {
                EngagementServiceError::NotFound(format!("Comment {} not found", comment_id))
            })?;

        if !policy::can_delete_comment(actor, comment.user_id) {
            return Err(EngagementServiceError::Forbidden(
                "You cannot delete this comment".to_string(),
            ));
        }

        self.comment_repo
            .delete_photo_comment(comment.id)
            .await
            .context("Failed to delete comment")?;
        Ok(())
    }

    /// Delete a video comment. Author or admin only.
    pub async fn delete_video_comment(
        &self,
        actor: &User,
        comment_id: i64,
    ) -> Result<(), EngagementServiceError> {
        let comment = self
            .comment_repo
            .get_video_comment(comment_id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| {
                EngagementServiceError::NotFound(format!("Comment {} not found", comment_id))
            })?;

        if !policy::can_delete_comment(actor, comment.user_id) {
            return Err(EngagementServiceError::Forbidden(
                "You cannot delete this comment".to_string(),
            ));
        }

        self.comment_repo
            .delete_video_comment(comment.id)
            .await
            .context("Failed to delete comment")?;
        Ok(())
    }
}

fn validated_body(body: &str) -> Result<&str, EngagementServiceError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(EngagementServiceError::ValidationError(
            "Comment cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
