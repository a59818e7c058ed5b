//! Database migrations
//!
//! Code-based migrations embedded as SQL strings for single-binary
//! deployment. Each migration is applied once and recorded in the
//! `_migrations` tracking table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements to apply
    pub up: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Migration version number
    pub version: i64,
    /// Migration name/description
    pub name: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

/// All migrations, in order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name VARCHAR(100) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                role VARCHAR(20) NOT NULL DEFAULT 'student',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#,
    },
    Migration {
        version: 2,
        name: "create_sessions",
        up: r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id INTEGER NOT NULL,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        "#,
    },
    Migration {
        version: 3,
        name: "create_albums",
        up: r#"
            CREATE TABLE IF NOT EXISTS albums (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                visibility VARCHAR(20) NOT NULL DEFAULT 'public',
                user_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_albums_user_id ON albums(user_id);
            CREATE INDEX IF NOT EXISTS idx_albums_visibility ON albums(visibility);
        "#,
    },
    Migration {
        version: 4,
        name: "create_photos",
        up: r#"
            CREATE TABLE IF NOT EXISTS photos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename VARCHAR(255) NOT NULL,
                original_name VARCHAR(255) NOT NULL,
                caption TEXT NOT NULL DEFAULT '',
                album_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (album_id) REFERENCES albums(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_photos_album_id ON photos(album_id);
            CREATE INDEX IF NOT EXISTS idx_photos_user_id ON photos(user_id);
            CREATE INDEX IF NOT EXISTS idx_photos_created_at ON photos(created_at);
        "#,
    },
    Migration {
        version: 5,
        name: "create_videos",
        up: r#"
            CREATE TABLE IF NOT EXISTS videos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename VARCHAR(255) NOT NULL,
                original_name VARCHAR(255) NOT NULL,
                caption TEXT NOT NULL DEFAULT '',
                album_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (album_id) REFERENCES albums(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_videos_album_id ON videos(album_id);
            CREATE INDEX IF NOT EXISTS idx_videos_user_id ON videos(user_id);
            CREATE INDEX IF NOT EXISTS idx_videos_created_at ON videos(created_at);
        "#,
    },
    Migration {
        version: 6,
        name: "create_tags",
        up: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name);
        "#,
    },
    Migration {
        version: 7,
        name: "create_photo_tags",
        up: r#"
            CREATE TABLE IF NOT EXISTS photo_tags (
                photo_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (photo_id, tag_id),
                FOREIGN KEY (photo_id) REFERENCES photos(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_photo_tags_tag_id ON photo_tags(tag_id);
        "#,
    },
    Migration {
        version: 8,
        name: "create_video_tags",
        up: r#"
            CREATE TABLE IF NOT EXISTS video_tags (
                video_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (video_id, tag_id),
                FOREIGN KEY (video_id) REFERENCES videos(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_video_tags_tag_id ON video_tags(tag_id);
        "#,
    },
    Migration {
        version: 9,
        name: "create_likes",
        up: r#"
            CREATE TABLE IF NOT EXISTS likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                photo_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (photo_id) REFERENCES photos(id) ON DELETE CASCADE,
                UNIQUE(user_id, photo_id)
            );
            CREATE INDEX IF NOT EXISTS idx_likes_photo_id ON likes(photo_id);
            CREATE INDEX IF NOT EXISTS idx_likes_user_id ON likes(user_id);
        "#,
    },
    Migration {
        version: 10,
        name: "create_video_likes",
        up: r#"
            CREATE TABLE IF NOT EXISTS video_likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                video_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (video_id) REFERENCES videos(id) ON DELETE CASCADE,
                UNIQUE(user_id, video_id)
            );
            CREATE INDEX IF NOT EXISTS idx_video_likes_video_id ON video_likes(video_id);
            CREATE INDEX IF NOT EXISTS idx_video_likes_user_id ON video_likes(user_id);
        "#,
    },
    Migration {
        version: 11,
        name: "create_comments",
        up: r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                photo_id INTEGER,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (photo_id) REFERENCES photos(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_comments_photo_id ON comments(photo_id);
            CREATE INDEX IF NOT EXISTS idx_comments_user_id ON comments(user_id);
        "#,
    },
    Migration {
        version: 12,
        name: "create_video_comments",
        up: r#"
            CREATE TABLE IF NOT EXISTS video_comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                video_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (video_id) REFERENCES videos(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_video_comments_video_id ON video_comments(video_id);
            CREATE INDEX IF NOT EXISTS idx_video_comments_user_id ON video_comments(user_id);
        "#,
    },
];

/// Run all pending migrations.
///
/// Creates the tracking table if missing, then applies every migration
/// not yet recorded, in version order. Returns the number applied.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration
async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    // Execute migration SQL (may contain multiple statements)
    for statement in split_sql_statements(migration.up) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    // Record the migration
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual statements, handling comments properly
fn split_sql_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut current_start = 0;
    let mut in_statement = false;

    for (i, c) in sql.char_indices() {
        match c {
            ';' => {
                if in_statement {
                    let stmt = sql[current_start..i].trim();
                    if !stmt.is_empty() && !is_comment_only(stmt) {
                        statements.push(stmt);
                    }
                    in_statement = false;
                }
                current_start = i + 1;
            }
            _ if !c.is_whitespace() && !in_statement => {
                current_start = i;
                in_statement = true;
            }
            _ => {}
        }
    }

    // Handle last statement without trailing semicolon
    if in_statement {
        let stmt = sql[current_start..].trim();
        if !stmt.is_empty() && !is_comment_only(stmt) {
            statements.push(stmt);
        }
    }

    statements
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    for line in s.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("--") {
            return false;
        }
    }
    true
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &SqlitePool) -> Result<bool> {
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(applied.len() == MIGRATIONS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    async fn migrated_pool() -> SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        pool
    }

    async fn insert_user(pool: &SqlitePool, email: &str) -> i64 {
        sqlx::query("INSERT INTO users (full_name, email, password_hash, role) VALUES (?, ?, ?, ?)")
            .bind("Test User")
            .bind(email)
            .bind("hash123")
            .bind("student")
            .execute(pool)
            .await
            .expect("Failed to create user")
            .last_insert_rowid()
    }

    async fn insert_album(pool: &SqlitePool, user_id: i64) -> i64 {
        sqlx::query("INSERT INTO albums (title, user_id) VALUES (?, ?)")
            .bind("Test Album")
            .bind(user_id)
            .execute(pool)
            .await
            .expect("Failed to create album")
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());

        // Running again should apply 0 migrations
        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_is_up_to_date() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let up_to_date = is_up_to_date(&pool).await.expect("Failed to check");
        assert!(!up_to_date);

        run_migrations(&pool).await.expect("Failed to run migrations");
        let up_to_date = is_up_to_date(&pool).await.expect("Failed to check");
        assert!(up_to_date);
    }

    #[tokio::test]
    async fn test_core_tables_created() {
        let pool = migrated_pool().await;

        let user_id = insert_user(&pool, "test@example.com").await;
        let album_id = insert_album(&pool, user_id).await;

        let result = sqlx::query(
            "INSERT INTO photos (filename, original_name, album_id, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind("abc.jpg")
        .bind("holiday.jpg")
        .bind(album_id)
        .bind(user_id)
        .execute(&pool)
        .await;
        assert!(result.is_ok());

        let result = sqlx::query(
            "INSERT INTO videos (filename, original_name, album_id, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind("def.mp4")
        .bind("clip.mp4")
        .bind(album_id)
        .bind(user_id)
        .execute(&pool)
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unique_email_constraint() {
        let pool = migrated_pool().await;

        insert_user(&pool, "dup@example.com").await;

        let result = sqlx::query(
            "INSERT INTO users (full_name, email, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind("Other")
        .bind("dup@example.com")
        .bind("hash456")
        .bind("student")
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unique_like_pair_constraint() {
        let pool = migrated_pool().await;

        let user_id = insert_user(&pool, "liker@example.com").await;
        let album_id = insert_album(&pool, user_id).await;
        let photo_id = sqlx::query(
            "INSERT INTO photos (filename, original_name, album_id, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind("a.jpg")
        .bind("a.jpg")
        .bind(album_id)
        .bind(user_id)
        .execute(&pool)
        .await
        .expect("Failed to create photo")
        .last_insert_rowid();

        sqlx::query("INSERT INTO likes (user_id, photo_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(photo_id)
            .execute(&pool)
            .await
            .expect("First like should succeed");

        let result = sqlx::query("INSERT INTO likes (user_id, photo_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(photo_id)
            .execute(&pool)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_foreign_key_constraints() {
        let pool = migrated_pool().await;

        // Session for a non-existent user should fail
        let result = sqlx::query(
            "INSERT INTO sessions (id, user_id, expires_at) VALUES (?, ?, datetime('now', '+1 day'))",
        )
        .bind("session123")
        .bind(999i64)
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_album_delete_cascades_to_media() {
        let pool = migrated_pool().await;

        let user_id = insert_user(&pool, "owner@example.com").await;
        let album_id = insert_album(&pool, user_id).await;

        sqlx::query(
            "INSERT INTO photos (filename, original_name, album_id, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind("a.jpg")
        .bind("a.jpg")
        .bind(album_id)
        .bind(user_id)
        .execute(&pool)
        .await
        .expect("Failed to create photo");

        sqlx::query("DELETE FROM albums WHERE id = ?")
            .bind(album_id)
            .execute(&pool)
            .await
            .expect("Failed to delete album");

        let row = sqlx::query("SELECT COUNT(*) as count FROM photos WHERE album_id = ?")
            .bind(album_id)
            .fetch_one(&pool)
            .await
            .expect("Failed to count photos");
        let count: i64 = row.get("count");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INT); CREATE TABLE b (id INT);";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);

        // Test with comments
        let sql_with_comments = "-- Comment\nCREATE TABLE a (id INT);";
        let statements = split_sql_statements(sql_with_comments);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_is_comment_only() {
        assert!(is_comment_only("-- This is a comment"));
        assert!(is_comment_only("-- Line 1\n-- Line 2"));
        assert!(!is_comment_only("CREATE TABLE test"));
        assert!(!is_comment_only("-- Comment\nCREATE TABLE test"));
    }
}
