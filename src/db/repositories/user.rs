//! User repository
//!
//! Database operations for user accounts. Email lookups are
//! case-insensitive so duplicate registration checks cannot be dodged
//! by changing case.

use crate::models::{User, UserRole};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, returning it with the assigned ID
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Update a user's profile fields
    async fn update(&self, user: &User) -> Result<()>;

    /// Set a user's role
    async fn set_role(&self, id: i64, role: UserRole) -> Result<()>;

    /// List all users, newest first
    async fn list_all(&self) -> Result<Vec<User>>;

    /// Count all users
    async fn count(&self) -> Result<i64>;

    /// Delete a user
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (full_name, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        let mut created = user.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, full_name, email, password_hash, role, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, full_name, email, password_hash, role, created_at
            FROM users
            WHERE LOWER(email) = LOWER(?)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET full_name = ?, email = ?, password_hash = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;

        Ok(())
    }

    async fn set_role(&self, id: i64, role: UserRole) -> Result<()> {
        sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.to_string())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to set user role")?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, full_name, email, password_hash, role, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;

        Ok(row.get("count"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;

        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let role_str: String = row.get("role");
    Ok(User {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: UserRole::from_str(&role_str)?,
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    fn test_user(email: &str) -> User {
        User::new(
            "Test User".to_string(),
            email.to_string(),
            "hashed_password".to_string(),
            UserRole::Student,
        )
    }

    #[tokio::test]
    async fn test_create_user() {
        let repo = setup_test_repo().await;

        let created = repo
            .create(&test_user("test@example.com"))
            .await
            .expect("Failed to create user");

        assert!(created.id > 0);
        assert_eq!(created.email, "test@example.com");
        assert_eq!(created.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_fails() {
        let repo = setup_test_repo().await;

        repo.create(&test_user("dup@example.com"))
            .await
            .expect("First create should succeed");

        let result = repo.create(&test_user("dup@example.com")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = setup_test_repo().await;

        let created = repo
            .create(&test_user("byid@example.com"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.email, "byid@example.com");

        let missing = repo.get_by_id(9999).await.expect("Failed to get user");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_by_email_case_insensitive() {
        let repo = setup_test_repo().await;

        repo.create(&test_user("casey@example.com"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_email("CASEY@Example.COM")
            .await
            .expect("Failed to get user");

        assert!(found.is_some());
        assert_eq!(found.unwrap().email, "casey@example.com");
    }

    #[tokio::test]
    async fn test_update_user() {
        let repo = setup_test_repo().await;

        let mut user = repo
            .create(&test_user("update@example.com"))
            .await
            .expect("Failed to create user");

        user.full_name = "Renamed User".to_string();
        user.email = "renamed@example.com".to_string();
        repo.update(&user).await.expect("Failed to update user");

        let found = repo
            .get_by_id(user.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.full_name, "Renamed User");
        assert_eq!(found.email, "renamed@example.com");
    }

    #[tokio::test]
    async fn test_set_role() {
        let repo = setup_test_repo().await;

        let user = repo
            .create(&test_user("promote@example.com"))
            .await
            .expect("Failed to create user");

        repo.set_role(user.id, UserRole::Admin)
            .await
            .expect("Failed to set role");

        let found = repo
            .get_by_id(user.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_list_all_and_count() {
        let repo = setup_test_repo().await;

        repo.create(&test_user("a@example.com")).await.unwrap();
        repo.create(&test_user("b@example.com")).await.unwrap();
        repo.create(&test_user("c@example.com")).await.unwrap();

        let users = repo.list_all().await.expect("Failed to list users");
        assert_eq!(users.len(), 3);

        let count = repo.count().await.expect("Failed to count users");
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let repo = setup_test_repo().await;

        let user = repo
            .create(&test_user("gone@example.com"))
            .await
            .expect("Failed to create user");

        repo.delete(user.id).await.expect("Failed to delete user");

        let found = repo.get_by_id(user.id).await.expect("Failed to get user");
        assert!(found.is_none());
    }
}
