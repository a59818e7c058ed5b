//! User service
//!
//! Business logic for accounts and authentication: registration, login
//! and logout, session validation, profile editing, and admin role
//! assignment.

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default session expiration time in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 7;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Email already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Actor is not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Target entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session expired
    #[error("Session expired")]
    SessionExpired,

    /// Session not found
    #[error("Session not found")]
    SessionNotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Login input
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Profile update input
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User service for managing accounts and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_expiration_days: i64,
}

impl UserService {
    /// Create a new user service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days: DEFAULT_SESSION_EXPIRATION_DAYS,
        }
    }

    /// Create a new user service with custom session expiration
    pub fn with_session_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_expiration_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days,
        }
    }

    /// Register a new user.
    ///
    /// Emails are normalized to lowercase; duplicate detection is
    /// case-insensitive. New accounts get the student role.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        validate_full_name(&input.full_name)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        let email = input.email.trim().to_lowercase();

        if self
            .user_repo
            .get_by_email(&email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(
            input.full_name.trim().to_string(),
            email,
            password_hash,
            UserRole::Student,
        );

        let created = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        tracing::info!("Registered user {} ({})", created.id, created.email);

        Ok(created)
    }

    /// Login with email and password, creating a session on success
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(input.email.trim())
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError("Invalid email or password".to_string())
            })?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        self.create_session(user.id).await
    }

    /// Create a new session for a user
    pub async fn create_session(&self, user_id: i64) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(self.session_expiration_days),
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }

    /// Logout by deleting the session
    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Validate a session token, returning the associated user.
    ///
    /// Expired sessions are deleted on sight.
    pub async fn validate_session(&self, token: &str) -> Result<User, UserServiceError> {
        let session = self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
            .ok_or(UserServiceError::SessionNotFound)?;

        if session.is_expired() {
            self.session_repo
                .delete(token)
                .await
                .context("Failed to delete expired session")?;
            return Err(UserServiceError::SessionExpired);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get session user")?
            .ok_or(UserServiceError::SessionNotFound)?;

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| UserServiceError::NotFound(format!("User {} not found", id)))
    }

    /// List all users (admin user management page)
    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self
            .user_repo
            .list_all()
            .await
            .context("Failed to list users")?)
    }

    /// Update the given user's profile.
    ///
    /// Changing email re-runs the duplicate check against other
    /// accounts; changing password re-hashes.
    pub async fn update_profile(
        &self,
        user_id: i64,
        input: UpdateProfileInput,
    ) -> Result<User, UserServiceError> {
        let mut user = self.get_user(user_id).await?;

        if let Some(full_name) = input.full_name {
            validate_full_name(&full_name)?;
            user.full_name = full_name.trim().to_string();
        }

        if let Some(email) = input.email {
            validate_email(&email)?;
            let email = email.trim().to_lowercase();
            if let Some(existing) = self
                .user_repo
                .get_by_email(&email)
                .await
                .context("Failed to check email")?
            {
                if existing.id != user.id {
                    return Err(UserServiceError::DuplicateEmail(email));
                }
            }
            user.email = email;
        }

        if let Some(password) = input.password {
            validate_password(&password)?;
            user.password_hash = hash_password(&password).context("Failed to hash password")?;
        }

        self.user_repo
            .update(&user)
            .await
            .context("Failed to update user")?;

        Ok(user)
    }

    /// Assign a role to a user.
    ///
    /// Admin only. An admin cannot demote themselves through this path,
    /// so a deployment always keeps at least the acting admin.
    pub async fn set_role(
        &self,
        actor: &User,
        target_id: i64,
        role: UserRole,
    ) -> Result<User, UserServiceError> {
        if !actor.is_admin() {
            return Err(UserServiceError::Forbidden(
                "Only admins can assign roles".to_string(),
            ));
        }

        if actor.id == target_id && role != UserRole::Admin {
            return Err(UserServiceError::Forbidden(
                "Admins cannot demote themselves".to_string(),
            ));
        }

        let target = self.get_user(target_id).await?;

        self.user_repo
            .set_role(target.id, role)
            .await
            .context("Failed to set role")?;

        tracing::info!("User {} set role of user {} to {}", actor.id, target.id, role);

        self.get_user(target_id).await
    }
}

fn validate_full_name(full_name: &str) -> Result<(), UserServiceError> {
    if full_name.trim().is_empty() {
        return Err(UserServiceError::ValidationError(
            "Name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), UserServiceError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(UserServiceError::ValidationError(
            "Invalid email address".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), UserServiceError> {
    if password.len() < 6 {
        return Err(UserServiceError::ValidationError(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSessionRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> UserService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        UserService::new(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool),
        )
    }

    #[tokio::test]
    async fn test_register_creates_student() {
        let service = setup_test_service().await;

        let user = service
            .register(RegisterInput::new("Ada Lovelace", "ada@example.com", "secret1"))
            .await
            .expect("Registration should succeed");

        assert!(user.id > 0);
        assert_eq!(user.full_name, "Ada Lovelace");
        assert_eq!(user.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = setup_test_service().await;

        let user = service
            .register(RegisterInput::new("Ada", "Ada@Example.COM", "secret1"))
            .await
            .expect("Registration should succeed");

        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_case_insensitive() {
        let service = setup_test_service().await;

        service
            .register(RegisterInput::new("Ada", "ada@example.com", "secret1"))
            .await
            .expect("First registration should succeed");

        let result = service
            .register(RegisterInput::new("Imposter", "ADA@EXAMPLE.COM", "other12"))
            .await;

        assert!(matches!(result, Err(UserServiceError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = setup_test_service().await;

        let no_name = service
            .register(RegisterInput::new("  ", "a@example.com", "secret1"))
            .await;
        assert!(matches!(no_name, Err(UserServiceError::ValidationError(_))));

        let bad_email = service
            .register(RegisterInput::new("Ada", "not-an-email", "secret1"))
            .await;
        assert!(matches!(bad_email, Err(UserServiceError::ValidationError(_))));

        let short_password = service
            .register(RegisterInput::new("Ada", "a@example.com", "short"))
            .await;
        assert!(matches!(
            short_password,
            Err(UserServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_success_and_session_validation() {
        let service = setup_test_service().await;

        let user = service
            .register(RegisterInput::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();

        let session = service
            .login(LoginInput::new("ada@example.com", "secret1"))
            .await
            .expect("Login should succeed");

        assert_eq!(session.user_id, user.id);
        assert!(!session.is_expired());

        let validated = service
            .validate_session(&session.id)
            .await
            .expect("Session should validate");
        assert_eq!(validated.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = setup_test_service().await;

        service
            .register(RegisterInput::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .login(LoginInput::new("ada@example.com", "wrong-password"))
            .await;

        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = setup_test_service().await;

        let result = service
            .login(LoginInput::new("nobody@example.com", "whatever"))
            .await;

        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let service = setup_test_service().await;

        service
            .register(RegisterInput::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();
        let session = service
            .login(LoginInput::new("ada@example.com", "secret1"))
            .await
            .unwrap();

        service.logout(&session.id).await.expect("Logout should succeed");

        let result = service.validate_session(&session.id).await;
        assert!(matches!(result, Err(UserServiceError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_expired_session_rejected() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let service = UserService::with_session_expiration(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool),
            -1, // Sessions are born expired
        );

        service
            .register(RegisterInput::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();
        let session = service
            .login(LoginInput::new("ada@example.com", "secret1"))
            .await
            .unwrap();

        let result = service.validate_session(&session.id).await;
        assert!(matches!(result, Err(UserServiceError::SessionExpired)));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let service = setup_test_service().await;

        let user = service
            .register(RegisterInput::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();

        let updated = service
            .update_profile(
                user.id,
                UpdateProfileInput {
                    full_name: Some("Ada King".to_string()),
                    email: Some("countess@example.com".to_string()),
                    password: None,
                },
            )
            .await
            .expect("Update should succeed");

        assert_eq!(updated.full_name, "Ada King");
        assert_eq!(updated.email, "countess@example.com");

        // Old password still works (unchanged)
        let session = service
            .login(LoginInput::new("countess@example.com", "secret1"))
            .await;
        assert!(session.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_duplicate_email() {
        let service = setup_test_service().await;

        service
            .register(RegisterInput::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();
        let other = service
            .register(RegisterInput::new("Grace", "grace@example.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .update_profile(
                other.id,
                UpdateProfileInput {
                    email: Some("ADA@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserServiceError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_set_role_requires_admin() {
        let service = setup_test_service().await;

        let student = service
            .register(RegisterInput::new("Student", "s@example.com", "secret1"))
            .await
            .unwrap();
        let target = service
            .register(RegisterInput::new("Target", "t@example.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .set_role(&student, target.id, UserRole::Editor)
            .await;

        assert!(matches!(result, Err(UserServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_cannot_demote_self() {
        let service = setup_test_service().await;

        let mut admin = service
            .register(RegisterInput::new("Admin", "admin@example.com", "secret1"))
            .await
            .unwrap();
        admin.role = UserRole::Admin;
        // Persist the admin role so the reload sees it
        service
            .set_role(&admin, admin.id, UserRole::Admin)
            .await
            .expect("Re-asserting admin role for self is allowed");

        let result = service
            .set_role(&admin, admin.id, UserRole::Student)
            .await;

        assert!(matches!(result, Err(UserServiceError::Forbidden(_))));

        let reloaded = service.get_user(admin.id).await.unwrap();
        assert_eq!(reloaded.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_admin_can_promote_others() {
        let service = setup_test_service().await;

        let mut admin = service
            .register(RegisterInput::new("Admin", "admin@example.com", "secret1"))
            .await
            .unwrap();
        admin.role = UserRole::Admin;

        let target = service
            .register(RegisterInput::new("Target", "t@example.com", "secret1"))
            .await
            .unwrap();

        let updated = service
            .set_role(&admin, target.id, UserRole::Editor)
            .await
            .expect("Promotion should succeed");

        assert_eq!(updated.role, UserRole::Editor);
    }
}
