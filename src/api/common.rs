//! Common API utilities and shared types
//!
//! This module contains shared utilities used across multiple API endpoints.

use serde::{Deserialize, Serialize};

use crate::models::User;

/// Default page number (1-indexed)
pub fn default_page() -> u32 {
    1
}

/// Basic pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Pagination plus the gallery search box
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    pub q: Option<String>,
}

/// User info as returned by the API. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role.to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    #[test]
    fn test_user_response_conversion() {
        let mut user = User::new(
            "Ada Lovelace".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            UserRole::Editor,
        );
        user.id = 7;

        let response = UserResponse::from(user);
        assert_eq!(response.id, 7);
        assert_eq!(response.role, "editor");
        assert!(!response.created_at.is_empty());
    }
}
