//! Album management
//!
//! Album creation, listing, the per-album item view, and cascading
//! deletion. Deleting an album removes every backing media file before
//! the rows go, so the uploads directory never keeps orphans around.

use crate::db::repositories::{AlbumRepository, PhotoRepository, VideoRepository};
use crate::models::{Album, AlbumVisibility, ListParams, MediaItem, PagedResult, User};
use crate::services::listing::merge_recent;
use crate::services::policy;
use crate::services::storage::MediaStorage;
use anyhow::Context;
use std::sync::Arc;

/// Page size for the album index
pub const ALBUM_PAGE_SIZE: u32 = 10;

/// Error types for album operations
#[derive(Debug, thiserror::Error)]
pub enum AlbumServiceError {
    /// Validation error (bad form input)
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

/// Album service
pub struct AlbumService {
    album_repo: Arc<dyn AlbumRepository>,
    photo_repo: Arc<dyn PhotoRepository>,
    video_repo: Arc<dyn VideoRepository>,
    storage: MediaStorage,
}

impl AlbumService {
    pub fn new(
        album_repo: Arc<dyn AlbumRepository>,
        photo_repo: Arc<dyn PhotoRepository>,
        video_repo: Arc<dyn VideoRepository>,
        storage: MediaStorage,
    ) -> Self {
        Self {
            album_repo,
            photo_repo,
            video_repo,
            storage,
        }
    }

    /// Create an album owned by the actor. Titles need not be unique.
    pub async fn create_album(
        &self,
        actor: &User,
        title: &str,
        description: &str,
        visibility: AlbumVisibility,
    ) -> Result<Album, AlbumServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AlbumServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }

        let album = Album::new(
            title.to_string(),
            description.trim().to_string(),
            visibility,
            actor.id,
        );
        let created = self
            .album_repo
            .create(&album)
            .await
            .context("Failed to create album")?;

        tracing::info!("User {} created album {}", actor.id, created.id);
        Ok(created)
    }

    /// Albums the viewer may see, newest first
    pub async fn list_albums(
        &self,
        viewer: Option<&User>,
        params: ListParams,
    ) -> Result<PagedResult<Album>, AlbumServiceError> {
        let (viewer_id, is_admin) = match viewer {
            Some(user) => (Some(user.id), user.is_admin()),
            None => (None, false),
        };
        let albums = self
            .album_repo
            .list_visible(viewer_id, is_admin)
            .await
            .context("Failed to list albums")?;

        Ok(PagedResult::paginate(albums, &params))
    }

    /// The actor's own albums, newest first
    pub async fn my_albums(
        &self,
        actor: &User,
        params: ListParams,
    ) -> Result<PagedResult<Album>, AlbumServiceError> {
        let albums = self
            .album_repo
            .list_by_user(actor.id)
            .await
            .context("Failed to list albums")?;

        Ok(PagedResult::paginate(albums, &params))
    }

    /// An album and one page of its photos and videos merged newest
    /// first. Visibility is enforced against the viewer.
    pub async fn album_items(
        &self,
        viewer: Option<&User>,
        album_id: i64,
        params: ListParams,
    ) -> Result<(Album, PagedResult<MediaItem>), AlbumServiceError> {
        let album = self.get_album(album_id).await?;

        if !policy::can_view_album(viewer, &album) {
            return Err(AlbumServiceError::Forbidden(
                "This album is private".to_string(),
            ));
        }

        let photos = self
            .photo_repo
            .list_by_album(album.id)
            .await
            .context("Failed to list album photos")?;
        let videos = self
            .video_repo
            .list_by_album(album.id)
            .await
            .context("Failed to list album videos")?;

        let items = PagedResult::paginate(merge_recent(photos, videos), &params);
        Ok((album, items))
    }

    /// Delete an album and everything in it. Owner or admin only.
    ///
    /// Media files and thumbnails are removed first, then the album row;
    /// the cascade takes the photo/video rows and their likes, comments,
    /// and tag links with it.
    pub async fn delete_album(&self, actor: &User, album_id: i64) -> Result<(), AlbumServiceError> {
        let album = self.get_album(album_id).await?;

        if !policy::can_manage(actor, album.user_id) {
            return Err(AlbumServiceError::Forbidden(
                "You cannot delete this album".to_string(),
            ));
        }

        let photos = self
            .photo_repo
            .list_by_album(album.id)
            .await
            .context("Failed to list album photos")?;
        for photo in &photos {
            self.storage.remove_media(&photo.filename).await;
            self.storage.remove_thumbnail(&photo.filename).await;
        }

        let videos = self
            .video_repo
            .list_by_album(album.id)
            .await
            .context("Failed to list album videos")?;
        for video in &videos {
            self.storage.remove_media(&video.filename).await;
        }

        self.album_repo
            .delete(album.id)
            .await
            .context("Failed to delete album")?;

        tracing::info!(
            "User {} deleted album {} ({} photos, {} videos)",
            actor.id,
            album.id,
            photos.len(),
            videos.len()
        );
        Ok(())
    }

    async fn get_album(&self, album_id: i64) -> Result<Album, AlbumServiceError> {
        self.album_repo
            .get_by_id(album_id)
            .await
            .context("Failed to get album")?
            .ok_or_else(|| AlbumServiceError::NotFound(format!("Album {} not found", album_id)))
    }
}
