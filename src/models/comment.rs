//! Comment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment on a media item.
///
/// Exactly one of `photo_id` / `video_id` is set; photo comments and
/// video comments live in separate tables but share this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// Comment body
    pub body: String,
    /// Author user ID
    pub user_id: i64,
    /// Target photo, if a photo comment
    pub photo_id: Option<i64>,
    /// Target video, if a video comment
    pub video_id: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's display name, for detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    /// Author's display name
    pub author_name: String,
}
