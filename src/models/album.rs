//! Album model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Album entity, a named container for photos and videos.
///
/// Every album has exactly one owner. Visibility gates who can see the
/// album and the media inside it: public albums are visible to everyone
/// including anonymous viewers, private albums only to the owner or an
/// admin. Deleting an album cascades to its media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    /// Unique identifier
    pub id: i64,
    /// Album title (no uniqueness constraint)
    pub title: String,
    /// Optional description
    pub description: String,
    /// Access scope
    pub visibility: AlbumVisibility,
    /// Owning user ID
    pub user_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Album {
    /// Create a new Album with the given parameters.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(
        title: String,
        description: String,
        visibility: AlbumVisibility,
        user_id: i64,
    ) -> Self {
        Self {
            id: 0, // Will be set by the database
            title,
            description,
            visibility,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Check if the album is publicly visible
    pub fn is_public(&self) -> bool {
        self.visibility == AlbumVisibility::Public
    }
}

/// Album access scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumVisibility {
    /// Visible to all viewers, including anonymous
    Public,
    /// Visible to the owner and admins only
    Private,
}

impl Default for AlbumVisibility {
    fn default() -> Self {
        Self::Public
    }
}

impl fmt::Display for AlbumVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlbumVisibility::Public => write!(f, "public"),
            AlbumVisibility::Private => write!(f, "private"),
        }
    }
}

impl FromStr for AlbumVisibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(AlbumVisibility::Public),
            "private" => Ok(AlbumVisibility::Private),
            _ => Err(anyhow::anyhow!("Invalid album visibility: {}", s)),
        }
    }
}
