//! Listing and search
//!
//! Merged gallery views over photos and videos: recency-ordered
//! interleave, text search, the `user:<id>` uploader filter, favorites,
//! own uploads, and the dashboard counters.

use crate::db::repositories::{
    AlbumRepository, LikeRepository, PhotoRepository, UserRepository, VideoRepository,
};
use crate::models::{Album, ListParams, MediaItem, MediaKind, PagedResult, Photo, User, Video};
use crate::services::storage::MediaStorage;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Page size for gallery style listings
pub const GALLERY_PAGE_SIZE: u32 = 12;

/// How many recent uploads the dashboard and profile show
const DASHBOARD_RECENT_UPLOADS: usize = 10;
/// How many recently liked items and albums the dashboard shows
const DASHBOARD_RECENT_LIKES: usize = 5;
const DASHBOARD_RECENT_ALBUMS: usize = 5;
/// How many newest accounts the admin dashboard shows
const DASHBOARD_RECENT_USERS: usize = 5;

/// Merge photos and videos into one newest-first sequence.
///
/// The sort is stable, so items sharing a timestamp keep their input
/// order with photos ahead of videos.
pub fn merge_recent(photos: Vec<Photo>, videos: Vec<Video>) -> Vec<MediaItem> {
    let mut items: Vec<MediaItem> = photos
        .into_iter()
        .map(MediaItem::Photo)
        .chain(videos.into_iter().map(MediaItem::Video))
        .collect();
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    items
}

/// A parsed gallery search query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Free-text component, if any
    pub text: Option<String>,
    /// Uploader restriction from a `user:<id>` prefix
    pub uploader_id: Option<i64>,
    /// Validation warning for a malformed `user:` token
    pub warning: Option<String>,
}

/// Parse a raw search string.
///
/// `user:<id>` at the front restricts results to that uploader and the
/// remainder becomes the text filter. A malformed id produces a warning
/// and the whole string is searched as text instead.
pub fn parse_search_query(raw: &str) -> SearchFilter {
    let raw = raw.trim();
    if raw.is_empty() {
        return SearchFilter::default();
    }

    if let Some(rest) = raw.strip_prefix("user:") {
        let (token, remainder) = match rest.split_once(char::is_whitespace) {
            Some((token, remainder)) => (token, remainder.trim()),
            None => (rest, ""),
        };

        match token.parse::<i64>() {
            Ok(id) => {
                return SearchFilter {
                    text: (!remainder.is_empty()).then(|| remainder.to_string()),
                    uploader_id: Some(id),
                    warning: None,
                };
            }
            Err(_) => {
                return SearchFilter {
                    text: Some(raw.to_string()),
                    uploader_id: None,
                    warning: Some(format!("Invalid user filter: {:?}", token)),
                };
            }
        }
    }

    SearchFilter {
        text: Some(raw.to_string()),
        uploader_id: None,
        warning: None,
    }
}

/// One page of the gallery, with any search warning to surface
#[derive(Debug, Serialize)]
pub struct GalleryPage {
    #[serde(flatten)]
    pub items: PagedResult<MediaItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The user's own uploads with per-kind counts
#[derive(Debug, Serialize)]
pub struct MyUploads {
    #[serde(flatten)]
    pub items: PagedResult<MediaItem>,
    pub photo_count: i64,
    pub video_count: i64,
}

/// Per-user dashboard: content counters plus recent activity
#[derive(Debug, Serialize)]
pub struct UserDashboard {
    pub album_count: i64,
    pub photo_count: i64,
    pub video_count: i64,
    pub recent_albums: Vec<Album>,
    pub recent_uploads: Vec<MediaItem>,
    /// Most recently liked items, newest like first
    pub recent_favorites: Vec<MediaItem>,
}

/// Site-wide dashboard for admins
#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub user_count: i64,
    pub album_count: i64,
    pub photo_count: i64,
    pub video_count: i64,
    /// Newest accounts first
    pub recent_users: Vec<User>,
    /// Bytes in the uploads directory, zero when unreadable
    pub upload_bytes: u64,
    /// Bytes in the thumbnails directory, zero when unreadable
    pub thumb_bytes: u64,
    /// Combined storage use
    pub storage_bytes: u64,
}

/// Listing service for merged gallery views and dashboards
pub struct ListingService {
    photo_repo: Arc<dyn PhotoRepository>,
    video_repo: Arc<dyn VideoRepository>,
    album_repo: Arc<dyn AlbumRepository>,
    user_repo: Arc<dyn UserRepository>,
    like_repo: Arc<dyn LikeRepository>,
    storage: MediaStorage,
}

fn viewer_scope(viewer: Option<&User>) -> (Option<i64>, bool) {
    match viewer {
        Some(user) => (Some(user.id), user.is_admin()),
        None => (None, false),
    }
}

impl ListingService {
    pub fn new(
        photo_repo: Arc<dyn PhotoRepository>,
        video_repo: Arc<dyn VideoRepository>,
        album_repo: Arc<dyn AlbumRepository>,
        user_repo: Arc<dyn UserRepository>,
        like_repo: Arc<dyn LikeRepository>,
        storage: MediaStorage,
    ) -> Self {
        Self {
            photo_repo,
            video_repo,
            album_repo,
            user_repo,
            like_repo,
            storage,
        }
    }

    /// The main gallery: visible photos and videos merged newest first,
    /// optionally filtered by a search query.
    pub async fn gallery(
        &self,
        viewer: Option<&User>,
        q: Option<&str>,
        params: ListParams,
    ) -> Result<GalleryPage> {
        let filter = q.map(parse_search_query).unwrap_or_default();
        let (viewer_id, is_admin) = viewer_scope(viewer);

        let photos = self
            .photo_repo
            .search_visible(viewer_id, is_admin, filter.text.as_deref(), filter.uploader_id)
            .await
            .context("Failed to search photos")?;
        let videos = self
            .video_repo
            .search_visible(viewer_id, is_admin, filter.text.as_deref(), filter.uploader_id)
            .await
            .context("Failed to search videos")?;

        Ok(GalleryPage {
            items: PagedResult::paginate(merge_recent(photos, videos), &params),
            warning: filter.warning,
        })
    }

    /// Items the user has liked, most recently liked first
    pub async fn favorites(&self, user: &User, params: ListParams) -> Result<PagedResult<MediaItem>> {
        let items = self.liked_items(user.id).await?;
        Ok(PagedResult::paginate(items, &params))
    }

    /// The user's liked items in like order, newest like first
    async fn liked_items(&self, user_id: i64) -> Result<Vec<MediaItem>> {
        let refs = self
            .like_repo
            .list_liked_refs(user_id)
            .await
            .context("Failed to list likes")?;
        let photos: HashMap<i64, Photo> = self
            .photo_repo
            .list_liked_by(user_id)
            .await
            .context("Failed to list liked photos")?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let videos: HashMap<i64, Video> = self
            .video_repo
            .list_liked_by(user_id)
            .await
            .context("Failed to list liked videos")?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(refs
            .into_iter()
            .filter_map(|(kind, id)| match kind {
                MediaKind::Photo => photos.get(&id).cloned().map(MediaItem::Photo),
                MediaKind::Video => videos.get(&id).cloned().map(MediaItem::Video),
            })
            .collect())
    }

    /// The user's own uploads, merged newest first
    pub async fn my_uploads(&self, user: &User, params: ListParams) -> Result<MyUploads> {
        let photos = self
            .photo_repo
            .list_by_user(user.id)
            .await
            .context("Failed to list uploaded photos")?;
        let videos = self
            .video_repo
            .list_by_user(user.id)
            .await
            .context("Failed to list uploaded videos")?;

        let photo_count = photos.len() as i64;
        let video_count = videos.len() as i64;
        Ok(MyUploads {
            items: PagedResult::paginate(merge_recent(photos, videos), &params),
            photo_count,
            video_count,
        })
    }

    /// Neighbors of an item within the viewer's visible gallery stream.
    ///
    /// Returns `(prev, next)` where `prev` is the adjacent newer item and
    /// `next` the adjacent older one. Scoped to what the viewer may see,
    /// so private items never leak into a stranger's navigation.
    pub async fn siblings(
        &self,
        viewer: Option<&User>,
        item: &MediaItem,
    ) -> Result<(Option<MediaItem>, Option<MediaItem>)> {
        let (viewer_id, is_admin) = viewer_scope(viewer);

        let photos = self
            .photo_repo
            .search_visible(viewer_id, is_admin, None, None)
            .await
            .context("Failed to list photos for navigation")?;
        let videos = self
            .video_repo
            .search_visible(viewer_id, is_admin, None, None)
            .await
            .context("Failed to list videos for navigation")?;

        let stream = merge_recent(photos, videos);
        let position = stream
            .iter()
            .position(|candidate| candidate.kind() == item.kind() && candidate.id() == item.id());

        Ok(match position {
            Some(idx) => {
                let prev = (idx > 0).then(|| stream[idx - 1].clone());
                let next = stream.get(idx + 1).cloned();
                (prev, next)
            }
            None => (None, None),
        })
    }

    /// The signed-in user's dashboard: counters plus recent activity
    pub async fn user_dashboard(&self, user: &User) -> Result<UserDashboard> {
        let mut recent_albums = self
            .album_repo
            .list_by_user(user.id)
            .await
            .context("Failed to list albums")?;
        recent_albums.truncate(DASHBOARD_RECENT_ALBUMS);

        let photos = self
            .photo_repo
            .list_by_user(user.id)
            .await
            .context("Failed to list photos")?;
        let videos = self
            .video_repo
            .list_by_user(user.id)
            .await
            .context("Failed to list videos")?;
        let mut recent_uploads = merge_recent(photos, videos);
        recent_uploads.truncate(DASHBOARD_RECENT_UPLOADS);

        let mut recent_favorites = self.liked_items(user.id).await?;
        recent_favorites.truncate(DASHBOARD_RECENT_LIKES);

        Ok(UserDashboard {
            album_count: self
                .album_repo
                .count_by_user(user.id)
                .await
                .context("Failed to count albums")?,
            photo_count: self
                .photo_repo
                .count_by_user(user.id)
                .await
                .context("Failed to count photos")?,
            video_count: self
                .video_repo
                .count_by_user(user.id)
                .await
                .context("Failed to count videos")?,
            recent_albums,
            recent_uploads,
            recent_favorites,
        })
    }

    /// Site-wide counters for the admin dashboard.
    ///
    /// Storage size is best effort and reads as zero on failure.
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard> {
        let mut recent_users = self
            .user_repo
            .list_all()
            .await
            .context("Failed to list users")?;
        recent_users.truncate(DASHBOARD_RECENT_USERS);

        let usage = self.storage.usage().await;

        Ok(AdminDashboard {
            user_count: self.user_repo.count().await.context("Failed to count users")?,
            album_count: self.album_repo.count().await.context("Failed to count albums")?,
            photo_count: self.photo_repo.count().await.context("Failed to count photos")?,
            video_count: self.video_repo.count().await.context("Failed to count videos")?,
            recent_users,
            upload_bytes: usage.upload_bytes,
            thumb_bytes: usage.thumb_bytes,
            storage_bytes: usage.total(),
        })
    }
}
