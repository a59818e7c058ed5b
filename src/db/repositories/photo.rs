//! Photo repository
//!
//! Database operations for photos. The search/visibility query feeds the
//! merged gallery stream: rows come back fully filtered and ordered so
//! the listing layer only has to merge and slice.

use crate::models::Photo;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Photo repository trait
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Create a new photo, returning it with the assigned ID
    async fn create(&self, photo: &Photo) -> Result<Photo>;

    /// Get photo by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Photo>>;

    /// Delete a photo (likes, comments, tag links cascade)
    async fn delete(&self, id: i64) -> Result<()>;

    /// List photos in an album, newest first
    async fn list_by_album(&self, album_id: i64) -> Result<Vec<Photo>>;

    /// List photos uploaded by a user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Photo>>;

    /// List photos liked by a user, newest first
    async fn list_liked_by(&self, user_id: i64) -> Result<Vec<Photo>>;

    /// List photos visible to the viewer, optionally filtered.
    ///
    /// `q` matches caption, tag name, or album title substrings
    /// (case-insensitive). `uploader_id` restricts to one uploader.
    /// Ordered newest first, ties broken by descending ID.
    async fn search_visible(
        &self,
        viewer_id: Option<i64>,
        is_admin: bool,
        q: Option<&str>,
        uploader_id: Option<i64>,
    ) -> Result<Vec<Photo>>;

    /// Count all photos
    async fn count(&self) -> Result<i64>;

    /// Count photos uploaded by a user
    async fn count_by_user(&self, user_id: i64) -> Result<i64>;
}

/// SQLx-based photo repository implementation
pub struct SqlxPhotoRepository {
    pool: SqlitePool,
}

impl SqlxPhotoRepository {
    /// Create a new SQLx photo repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PhotoRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_COLUMNS: &str = "p.id, p.filename, p.original_name, p.caption, p.album_id, p.user_id, p.created_at";

#[async_trait]
impl PhotoRepository for SqlxPhotoRepository {
    async fn create(&self, photo: &Photo) -> Result<Photo> {
        let result = sqlx::query(
            r#"
            INSERT INTO photos (filename, original_name, caption, album_id, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&photo.filename)
        .bind(&photo.original_name)
        .bind(&photo.caption)
        .bind(photo.album_id)
        .bind(photo.user_id)
        .bind(photo.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create photo")?;

        let mut created = photo.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Photo>> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, original_name, caption, album_id, user_id, created_at
            FROM photos
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get photo by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_photo(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete photo")?;

        Ok(())
    }

    async fn list_by_album(&self, album_id: i64) -> Result<Vec<Photo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, original_name, caption, album_id, user_id, created_at
            FROM photos
            WHERE album_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list photos by album")?;

        rows.iter().map(row_to_photo).collect()
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Photo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, original_name, caption, album_id, user_id, created_at
            FROM photos
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list photos by user")?;

        rows.iter().map(row_to_photo).collect()
    }

    async fn list_liked_by(&self, user_id: i64) -> Result<Vec<Photo>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM photos p
            JOIN likes l ON l.photo_id = p.id
            WHERE l.user_id = ?
            ORDER BY p.created_at DESC, p.id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list photos liked by user")?;

        rows.iter().map(row_to_photo).collect()
    }

    async fn search_visible(
        &self,
        viewer_id: Option<i64>,
        is_admin: bool,
        q: Option<&str>,
        uploader_id: Option<i64>,
    ) -> Result<Vec<Photo>> {
        let pattern = q.map(|q| format!("%{}%", q.to_lowercase()));

        let rows = sqlx::query(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM photos p
            JOIN albums a ON p.album_id = a.id
            WHERE (? OR a.visibility = 'public' OR a.user_id = ?)
              AND (? IS NULL OR p.user_id = ?)
              AND (? IS NULL
                   OR LOWER(p.caption) LIKE ?
                   OR LOWER(a.title) LIKE ?
                   OR EXISTS (
                       SELECT 1 FROM photo_tags pt
                       JOIN tags t ON pt.tag_id = t.id
                       WHERE pt.photo_id = p.id AND t.name LIKE ?
                   ))
            ORDER BY p.created_at DESC, p.id DESC
            "#
        ))
        .bind(is_admin)
        .bind(viewer_id)
        .bind(uploader_id)
        .bind(uploader_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search visible photos")?;

        rows.iter().map(row_to_photo).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM photos")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count photos")?;

        Ok(row.get("count"))
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM photos WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count photos by user")?;

        Ok(row.get("count"))
    }
}

fn row_to_photo(row: &sqlx::sqlite::SqliteRow) -> Result<Photo> {
    Ok(Photo {
        id: row.get("id"),
        filename: row.get("filename"),
        original_name: row.get("original_name"),
        caption: row.get("caption"),
        album_id: row.get("album_id"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::Utc;

    async fn setup_test_repo() -> (SqlitePool, SqlxPhotoRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxPhotoRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_test_user(pool: &SqlitePool, id: i64) {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(format!("User {}", id))
        .bind(format!("user{}@example.com", id))
        .bind("hash")
        .bind("student")
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("Failed to create test user");
    }

    async fn create_test_album(pool: &SqlitePool, id: i64, user_id: i64, visibility: &str) {
        sqlx::query(
            "INSERT INTO albums (id, title, visibility, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(format!("Album {}", id))
        .bind(visibility)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to create test album");
    }

    fn test_photo(caption: &str, album_id: i64, user_id: i64) -> Photo {
        Photo {
            id: 0,
            filename: "abc.jpg".to_string(),
            original_name: "photo.jpg".to_string(),
            caption: caption.to_string(),
            album_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_photo() {
        let (pool, repo) = setup_test_repo().await;
        create_test_user(&pool, 1).await;
        create_test_album(&pool, 1, 1, "public").await;

        let created = repo
            .create(&test_photo("sunset", 1, 1))
            .await
            .expect("Failed to create photo");
        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get photo")
            .expect("Photo not found");
        assert_eq!(found.caption, "sunset");
        assert_eq!(found.album_id, 1);
    }

    #[tokio::test]
    async fn test_search_visible_scopes_private_albums() {
        let (pool, repo) = setup_test_repo().await;
        create_test_user(&pool, 1).await;
        create_test_user(&pool, 2).await;
        create_test_album(&pool, 1, 1, "public").await;
        create_test_album(&pool, 2, 2, "private").await;

        repo.create(&test_photo("in public", 1, 1)).await.unwrap();
        repo.create(&test_photo("in private", 2, 2)).await.unwrap();

        // Anonymous sees only the public album's photo
        let anon = repo.search_visible(None, false, None, None).await.unwrap();
        assert_eq!(anon.len(), 1);
        assert_eq!(anon[0].caption, "in public");

        // The private album's owner sees both
        let owner = repo
            .search_visible(Some(2), false, None, None)
            .await
            .unwrap();
        assert_eq!(owner.len(), 2);

        // Admin sees both
        let admin = repo
            .search_visible(Some(99), true, None, None)
            .await
            .unwrap();
        assert_eq!(admin.len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_caption_album_title_and_tag() {
        let (pool, repo) = setup_test_repo().await;
        create_test_user(&pool, 1).await;
        create_test_album(&pool, 1, 1, "public").await;

        let by_caption = repo.create(&test_photo("Golden Sunset", 1, 1)).await.unwrap();
        let by_tag = repo.create(&test_photo("untitled", 1, 1)).await.unwrap();
        repo.create(&test_photo("other", 1, 1)).await.unwrap();

        sqlx::query("INSERT INTO tags (id, name) VALUES (1, 'sunset')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO photo_tags (photo_id, tag_id) VALUES (?, 1)")
            .bind(by_tag.id)
            .execute(&pool)
            .await
            .unwrap();

        let results = repo
            .search_visible(None, false, Some("SUNSET"), None)
            .await
            .unwrap();
        let ids: Vec<i64> = results.iter().map(|p| p.id).collect();
        assert!(ids.contains(&by_caption.id));
        assert!(ids.contains(&by_tag.id));
        assert_eq!(results.len(), 2);

        // Album title substring matches every photo in that album
        let by_album = repo
            .search_visible(None, false, Some("album 1"), None)
            .await
            .unwrap();
        assert_eq!(by_album.len(), 3);
    }

    #[tokio::test]
    async fn test_search_uploader_filter() {
        let (pool, repo) = setup_test_repo().await;
        create_test_user(&pool, 1).await;
        create_test_user(&pool, 2).await;
        create_test_album(&pool, 1, 1, "public").await;

        repo.create(&test_photo("one", 1, 1)).await.unwrap();
        repo.create(&test_photo("two", 1, 2)).await.unwrap();

        let results = repo
            .search_visible(None, false, None, Some(2))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].caption, "two");
    }

    #[tokio::test]
    async fn test_list_liked_by() {
        let (pool, repo) = setup_test_repo().await;
        create_test_user(&pool, 1).await;
        create_test_album(&pool, 1, 1, "public").await;

        let liked = repo.create(&test_photo("liked", 1, 1)).await.unwrap();
        repo.create(&test_photo("not liked", 1, 1)).await.unwrap();

        sqlx::query("INSERT INTO likes (user_id, photo_id) VALUES (1, ?)")
            .bind(liked.id)
            .execute(&pool)
            .await
            .unwrap();

        let favorites = repo.list_liked_by(1).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, liked.id);
    }

    #[tokio::test]
    async fn test_list_by_album_and_user_and_counts() {
        let (pool, repo) = setup_test_repo().await;
        create_test_user(&pool, 1).await;
        create_test_album(&pool, 1, 1, "public").await;
        create_test_album(&pool, 2, 1, "public").await;

        repo.create(&test_photo("a", 1, 1)).await.unwrap();
        repo.create(&test_photo("b", 1, 1)).await.unwrap();
        repo.create(&test_photo("c", 2, 1)).await.unwrap();

        assert_eq!(repo.list_by_album(1).await.unwrap().len(), 2);
        assert_eq!(repo.list_by_user(1).await.unwrap().len(), 3);
        assert_eq!(repo.count().await.unwrap(), 3);
        assert_eq!(repo.count_by_user(1).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_photo() {
        let (pool, repo) = setup_test_repo().await;
        create_test_user(&pool, 1).await;
        create_test_album(&pool, 1, 1, "public").await;

        let photo = repo.create(&test_photo("gone", 1, 1)).await.unwrap();
        repo.delete(photo.id).await.expect("Failed to delete photo");

        assert!(repo.get_by_id(photo.id).await.unwrap().is_none());
    }
}
