//! Photo and video models plus the merged media item type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Photo entity.
///
/// Stored on disk under the uploads directory as `filename` (a generated
/// uuid name); `original_name` keeps what the uploader called it. A
/// thumbnail with a `_thumb` suffix lives in the thumbnails directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    /// Unique identifier
    pub id: i64,
    /// Generated on-disk filename
    pub filename: String,
    /// Filename as uploaded
    pub original_name: String,
    /// Caption text
    pub caption: String,
    /// Containing album ID
    pub album_id: i64,
    /// Uploading user ID
    pub user_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Photo {
    /// Derive the thumbnail filename by suffixing the stem with `_thumb`.
    ///
    /// `abc123.jpg` becomes `abc123_thumb.jpg`; an extension-less name
    /// gets the bare suffix.
    pub fn thumbnail_name(&self) -> String {
        thumbnail_name(&self.filename)
    }
}

/// Video entity. Same shape as [`Photo`] but without a thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Unique identifier
    pub id: i64,
    /// Generated on-disk filename
    pub filename: String,
    /// Filename as uploaded
    pub original_name: String,
    /// Caption text
    pub caption: String,
    /// Containing album ID
    pub album_id: i64,
    /// Uploading user ID
    pub user_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Compute the `_thumb`-suffixed name for an on-disk filename.
pub fn thumbnail_name(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_thumb.{}", stem, ext),
        None => format!("{}_thumb", filename),
    }
}

/// Media kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A photo or video in a merged listing.
///
/// Gallery views interleave both kinds by recency; this union carries the
/// discriminant so handlers and templates never inspect runtime types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaItem {
    Photo(Photo),
    Video(Video),
}

impl MediaItem {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Photo(_) => MediaKind::Photo,
            MediaItem::Video(_) => MediaKind::Video,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            MediaItem::Photo(p) => p.id,
            MediaItem::Video(v) => v.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            MediaItem::Photo(p) => p.created_at,
            MediaItem::Video(v) => v.created_at,
        }
    }

    pub fn caption(&self) -> &str {
        match self {
            MediaItem::Photo(p) => &p.caption,
            MediaItem::Video(v) => &v.caption,
        }
    }

    pub fn album_id(&self) -> i64 {
        match self {
            MediaItem::Photo(p) => p.album_id,
            MediaItem::Video(v) => v.album_id,
        }
    }

    pub fn user_id(&self) -> i64 {
        match self {
            MediaItem::Photo(p) => p.user_id,
            MediaItem::Video(v) => v.user_id,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            MediaItem::Photo(p) => &p.filename,
            MediaItem::Video(v) => &v.filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_photo(id: i64) -> Photo {
        Photo {
            id,
            filename: format!("{}.jpg", id),
            original_name: "original.jpg".to_string(),
            caption: "a photo".to_string(),
            album_id: 1,
            user_id: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_thumbnail_name() {
        assert_eq!(thumbnail_name("abc123.jpg"), "abc123_thumb.jpg");
        assert_eq!(thumbnail_name("a.b.png"), "a.b_thumb.png");
        assert_eq!(thumbnail_name("noext"), "noext_thumb");
    }

    #[test]
    fn test_photo_thumbnail_name() {
        let photo = make_photo(7);
        assert_eq!(photo.thumbnail_name(), "7_thumb.jpg");
    }

    #[test]
    fn test_media_item_accessors() {
        let photo = make_photo(3);
        let item = MediaItem::Photo(photo.clone());

        assert_eq!(item.kind(), MediaKind::Photo);
        assert_eq!(item.id(), 3);
        assert_eq!(item.caption(), "a photo");
        assert_eq!(item.album_id(), 1);
        assert_eq!(item.created_at(), photo.created_at);
    }

    #[test]
    fn test_media_item_serializes_kind_tag() {
        let item = MediaItem::Photo(make_photo(1));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"photo\""));
    }
}
