//! Tag model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity for labeling media.
///
/// Tag names are unique and stored lowercase; matching on attach is
/// case-insensitive so "Sunset" and "sunset" reuse the same row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag name (unique, lowercase)
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new Tag with the given name.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(name: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            name,
            created_at: Utc::now(),
        }
    }
}
