//! Media management
//!
//! Photo and video uploads, detail views, and deletion. Uploads
//! validate the file extension against one shared allow list, store the
//! bytes under a generated name, and parse the free-text tag field into
//! deduplicated lowercase tags.

use crate::db::repositories::{
    AlbumRepository, CommentRepository, LikeRepository, PhotoRepository, TagRepository,
    VideoRepository,
};
use crate::models::{CommentWithAuthor, Photo, Tag, User, Video};
use crate::services::policy;
use crate::services::storage::MediaStorage;
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// File extensions accepted for upload, photos and videos alike
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "mp4", "mov", "avi", "mkv", "webm",
];

/// Whether a filename carries an allowed extension (case-insensitive).
///
/// Extension-less names are rejected.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Parse a comma-separated tag field.
///
/// Names are trimmed and lowercased, empties dropped, duplicates
/// removed while keeping first-seen order.
pub fn parse_tags(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for raw in text.split(',') {
        let name = raw.trim().to_lowercase();
        if !name.is_empty() && !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// Error types for media operations
#[derive(Debug, thiserror::Error)]
pub enum MediaServiceError {
    /// Validation error (bad upload, unsupported extension)
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

/// Input for a photo or video upload
#[derive(Debug, Clone)]
pub struct UploadInput {
    pub album_id: i64,
    pub original_name: String,
    pub data: Vec<u8>,
    pub caption: String,
    pub tag_text: String,
}

/// A photo with everything its detail page shows
#[derive(Debug, Serialize)]
pub struct PhotoDetail {
    pub photo: Photo,
    pub tags: Vec<Tag>,
    pub like_count: i64,
    pub liked_by_viewer: bool,
    pub comments: Vec<CommentWithAuthor>,
}

/// A video with everything its detail page shows
#[derive(Debug, Serialize)]
pub struct VideoDetail {
    pub video: Video,
    pub tags: Vec<Tag>,
    pub like_count: i64,
    pub liked_by_viewer: bool,
    pub comments: Vec<CommentWithAuthor>,
}

/// Media service for uploads, detail views, and deletion
pub struct MediaService {
    photo_repo: Arc<dyn PhotoRepository>,
    video_repo: Arc<dyn VideoRepository>,
    album_repo: Arc<dyn AlbumRepository>,
    tag_repo: Arc<dyn TagRepository>,
    like_repo: Arc<dyn LikeRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    storage: MediaStorage,
    max_file_size: u64,
}

impl MediaService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        photo_repo: Arc<dyn PhotoRepository>,
        video_repo: Arc<dyn VideoRepository>,
        album_repo: Arc<dyn AlbumRepository>,
        tag_repo: Arc<dyn TagRepository>,
        like_repo: Arc<dyn LikeRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        storage: MediaStorage,
        max_file_size: u64,
    ) -> Self {
        Self {
            photo_repo,
            video_repo,
            album_repo,
            tag_repo,
            like_repo,
            comment_repo,
            storage,
            max_file_size,
        }
    }

    async fn validated_album(
        &self,
        actor: &User,
        album_id: i64,
    ) -> Result<(), MediaServiceError> {
        let album = self
            .album_repo
            .get_by_id(album_id)
            .await
            .context("Failed to get album")?
            .ok_or_else(|| MediaServiceError::NotFound(format!("Album {} not found", album_id)))?;

        if !policy::can_manage(actor, album.user_id) {
            return Err(MediaServiceError::Forbidden(
                "You cannot upload to this album".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_upload(&self, input: &UploadInput) -> Result<(), MediaServiceError> {
        if input.data.is_empty() {
            return Err(MediaServiceError::ValidationError(
                "No file provided".to_string(),
            ));
        }
        if input.data.len() as u64 > self.max_file_size {
            return Err(MediaServiceError::ValidationError(
                "File is too large".to_string(),
            ));
        }
        if !allowed_file(&input.original_name) {
            return Err(MediaServiceError::ValidationError(format!(
                "Unsupported file type: {}",
                input.original_name
            )));
        }
        Ok(())
    }

    async fn apply_tags(
        &self,
        tag_text: &str,
        item_id: i64,
        for_video: bool,
    ) -> Result<(), MediaServiceError> {
        for name in parse_tags(tag_text) {
            let tag = self
                .tag_repo
                .get_or_create(&name)
                .await
                .context("Failed to create tag")?;
            if for_video {
                self.tag_repo
                    .attach_to_video(item_id, tag.id)
                    .await
                    .context("Failed to attach tag to video")?;
            } else {
                self.tag_repo
                    .attach_to_photo(item_id, tag.id)
                    .await
                    .context("Failed to attach tag to photo")?;
            }
        }
        Ok(())
    }

    /// Upload a photo into an album the actor may manage.
    ///
    /// Stores the file, derives a thumbnail, and attaches parsed tags.
    pub async fn upload_photo(
        &self,
        actor: &User,
        input: UploadInput,
    ) -> Result<Photo, MediaServiceError> {
        self.validate_upload(&input)?;
        self.validated_album(actor, input.album_id).await?;

        let filename = self
            .storage
            .save(&input.original_name, &input.data)
            .await
            .context("Failed to store photo")?;
        self.storage
            .generate_thumbnail(&filename)
            .await
            .context("Failed to generate thumbnail")?;

        let photo = Photo {
            id: 0,
            filename,
            original_name: input.original_name,
            caption: input.caption.trim().to_string(),
            album_id: input.album_id,
            user_id: actor.id,
            created_at: Utc::now(),
        };
        let created = self
            .photo_repo
            .create(&photo)
            .await
            .context("Failed to create photo")?;

        self.apply_tags(&input.tag_text, created.id, false).await?;

        tracing::info!("User {} uploaded photo {}", actor.id, created.id);
        Ok(created)
    }

    /// Upload a video into an album the actor may manage.
    ///
    /// No thumbnail is derived; tags are parsed and attached the same
    /// way as for photos.
    pub async fn upload_video(
        &self,
        actor: &User,
        input: UploadInput,
    ) -> Result<Video, MediaServiceError> {
        self.validate_upload(&input)?;
        self.validated_album(actor, input.album_id).await?;

        let filename = self
            .storage
            .save(&input.original_name, &input.data)
            .await
            .context("Failed to store video")?;

        let video = Video {
            id: 0,
            filename,
            original_name: input.original_name,
            caption: input.caption.trim().to_string(),
            album_id: input.album_id,
            user_id: actor.id,
            created_at: Utc::now(),
        };
        let created = self
            .video_repo
            .create(&video)
            .await
            .context("Failed to create video")?;

        self.apply_tags(&input.tag_text, created.id, true).await?;

        tracing::info!("User {} uploaded video {}", actor.id, created.id);
        Ok(created)
    }

    /// Load a photo with its tags, like state, and comments.
    ///
    /// Enforces the album's visibility against the viewer.
    pub async fn photo_detail(
        &self,
        viewer: Option<&User>,
        id: i64,
    ) -> Result<PhotoDetail, MediaServiceError> {
        let photo = self
            .photo_repo
            .get_by_id(id)
            .await
            .context("Failed to get photo")?
            .ok_or_else(|| MediaServiceError::NotFound(format!("Photo {} not found", id)))?;

        self.check_album_visible(viewer, photo.album_id).await?;

        let tags = self
            .tag_repo
            .list_for_photo(photo.id)
            .await
            .context("Failed to list photo tags")?;
        let like_count = self
            .like_repo
            .count_for_photo(photo.id)
            .await
            .context("Failed to count likes")?;
        let liked_by_viewer = match viewer {
            Some(user) => self
                .like_repo
                .photo_like_exists(user.id, photo.id)
                .await
                .context("Failed to check like")?,
            None => false,
        };
        let comments = self
            .comment_repo
            .list_for_photo(photo.id)
            .await
            .context("Failed to list comments")?;

        Ok(PhotoDetail {
            photo,
            tags,
            like_count,
            liked_by_viewer,
            comments,
        })
    }

    /// Load a video with its tags, like state, and comments.
    pub async fn video_detail(
        &self,
        viewer: Option<&User>,
        id: i64,
    ) -> Result<VideoDetail, MediaServiceError> {
        let video = self
            .video_repo
            .get_by_id(id)
            .await
            .context("Failed to get video")?
            .ok_or_else(|| MediaServiceError::NotFound(format!("Video {} not found", id)))?;

        self.check_album_visible(viewer, video.album_id).await?;

        let tags = self
            .tag_repo
            .list_for_video(video.id)
            .await
            .context("Failed to list video tags")?;
        let like_count = self
            .like_repo
            .count_for_video(video.id)
            .await
            .context("Failed to count likes")?;
        let liked_by_viewer = match viewer {
            Some(user) => self
                .like_repo
                .video_like_exists(user.id, video.id)
                .await
                .context("Failed to check like")?,
            None => false,
        };
        let comments = self
            .comment_repo
            .list_for_video(video.id)
            .await
            .context("Failed to list comments")?;

        Ok(VideoDetail {
            video,
            tags,
            like_count,
            liked_by_viewer,
            comments,
        })
    }

    async fn check_album_visible(
        &self,
        viewer: Option<&User>,
        album_id: i64,
    ) -> Result<(), MediaServiceError> {
        let album = self
            .album_repo
            .get_by_id(album_id)
            .await
            .context("Failed to get album")?
            .ok_or_else(|| MediaServiceError::NotFound(format!("Album {} not found", album_id)))?;

        if !policy::can_view_album(viewer, &album) {
            return Err(MediaServiceError::Forbidden(
                "This item is private".to_string(),
            ));
        }
        Ok(())
    }

    /// Delete a photo, its backing file, and its thumbnail.
    ///
    /// Uploader or admin only. Files go first; the row delete cascades
    /// to likes, comments, and tag links.
    pub async fn delete_photo(&self, actor: &User, id: i64) -> Result<(), MediaServiceError> {
        let photo = self
            .photo_repo
            .get_by_id(id)
            .await
            .context("Failed to get photo")?
            .ok_or_else(|| MediaServiceError::NotFound(format!("Photo {} not found", id)))?;

        if !policy::can_manage(actor, photo.user_id) {
            return Err(MediaServiceError::Forbidden(
                "You cannot delete this photo".to_string(),
            ));
        }

        self.storage.remove_media(&photo.filename).await;
        self.storage.remove_thumbnail(&photo.filename).await;
        self.photo_repo
            .delete(photo.id)
            .await
            .context("Failed to delete photo")?;

        tracing::info!("User {} deleted photo {}", actor.id, photo.id);
        Ok(())
    }

    /// Delete a video and its backing file. Uploader or admin only.
    pub async fn delete_video(&self, actor: &User, id: i64) -> Result<(), MediaServiceError> {
        let video = self
            .video_repo
            .get_by_id(id)
            .await
            .context("Failed to get video")?
            .ok_or_else(|| MediaServiceError::NotFound(format!("Video {} not found", id)))?;

        if !policy::can_manage(actor, video.user_id) {
            return Err(MediaServiceError::Forbidden(
                "You cannot delete this video".to_string(),
            ));
        }

        self.storage.remove_media(&video.filename).await;
        self.video_repo
            .delete(video.id)
            .await
            .context("Failed to delete video")?;

        tracing::info!("User {} deleted video {}", actor.id, video.id);
        Ok(())
    }
}
