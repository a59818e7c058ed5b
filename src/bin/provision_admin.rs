//! Idempotent admin provisioning.
//!
//! Run once at deployment time to guarantee an admin account exists:
//!
//! ```text
//! PHOTODEN_ADMIN_EMAIL=admin@example.com \
//! PHOTODEN_ADMIN_PASSWORD=change-me \
//! provision-admin
//! ```
//!
//! If the account already exists it is promoted to admin if needed and
//! otherwise left alone; the password is never overwritten.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photoden::{
    config::Config,
    db::{self, repositories::{SqlxUserRepository, UserRepository}},
    models::{User, UserRole},
    services::hash_password,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoden=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let email = std::env::var("PHOTODEN_ADMIN_EMAIL")
        .context("PHOTODEN_ADMIN_EMAIL must be set")?
        .trim()
        .to_lowercase();
    let password =
        std::env::var("PHOTODEN_ADMIN_PASSWORD").context("PHOTODEN_ADMIN_PASSWORD must be set")?;
    let full_name =
        std::env::var("PHOTODEN_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());

    if email.is_empty() || !email.contains('@') {
        bail!("PHOTODEN_ADMIN_EMAIL is not a valid email address");
    }
    if password.len() < 6 {
        bail!("PHOTODEN_ADMIN_PASSWORD must be at least 6 characters");
    }

    let config = Config::load_with_env(Path::new("config.yml"))?;
    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;

    let user_repo = SqlxUserRepository::new(pool);

    match user_repo.get_by_email(&email).await? {
        Some(existing) if existing.is_admin() => {
            tracing::info!("Admin {} already provisioned, nothing to do", email);
        }
        Some(existing) => {
            user_repo.set_role(existing.id, UserRole::Admin).await?;
            tracing::info!("Promoted existing user {} to admin", email);
        }
        None => {
            let password_hash = hash_password(&password)?;
            let user = User::new(full_name, email.clone(), password_hash, UserRole::Admin);
            let created = user_repo.create(&user).await?;
            tracing::info!("Created admin {} (user {})", email, created.id);
        }
    }

    Ok(())
}
