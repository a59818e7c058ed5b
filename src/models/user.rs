//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User entity representing a registered account.
///
/// Users own albums and media uploads. Roles determine administrative
/// permissions; ownership determines editing rights over content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub full_name: String,
    /// Email address (unique, stored lowercase)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role
    pub role: UserRole,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this
    /// function. Use `services::password::hash_password()`.
    pub fn new(full_name: String, email: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: 0, // Will be set by the database
            full_name,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }

    /// Check if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check if the user can modify content owned by `owner_id`.
    ///
    /// Admins can modify any content; everyone else only their own.
    pub fn can_edit(&self, owner_id: i64) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - full access, sees all content
    Admin,
    /// Editor - regular account with elevated labeling, no extra rights
    Editor,
    /// Student - regular account
    Student,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Student
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Editor => write!(f, "editor"),
            UserRole::Student => write!(f, "student"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            "student" => Ok(UserRole::Student),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}
