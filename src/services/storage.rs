//! Media file storage
//!
//! Writes uploaded media under the uploads directory and derived
//! thumbnails under the thumbnails directory. Stored names are random
//! UUIDs with the original extension, so uploads never collide or
//! traverse paths.

use crate::config::UploadConfig;
use crate::models::thumbnail_name;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Longest thumbnail edge in pixels
const THUMBNAIL_SIZE: u32 = 480;

/// Bytes stored on disk, split by directory
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StorageUsage {
    /// Bytes under the uploads directory
    pub upload_bytes: u64,
    /// Bytes under the thumbnails directory
    pub thumb_bytes: u64,
}

impl StorageUsage {
    pub fn total(&self) -> u64 {
        self.upload_bytes + self.thumb_bytes
    }
}

/// Filesystem storage for uploaded media and thumbnails
#[derive(Clone)]
pub struct MediaStorage {
    uploads_dir: PathBuf,
    thumbs_dir: PathBuf,
}

impl MediaStorage {
    /// Create storage rooted at the configured directories
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            uploads_dir: config.path.clone(),
            thumbs_dir: config.thumbs_path.clone(),
        }
    }

    /// Create storage rooted at explicit directories
    pub fn with_dirs(uploads_dir: impl Into<PathBuf>, thumbs_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            thumbs_dir: thumbs_dir.into(),
        }
    }

    /// Create both storage directories if they do not exist
    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .with_context(|| format!("Failed to create uploads dir {:?}", self.uploads_dir))?;
        tokio::fs::create_dir_all(&self.thumbs_dir)
            .await
            .with_context(|| format!("Failed to create thumbnails dir {:?}", self.thumbs_dir))?;
        Ok(())
    }

    /// Path of a stored media file
    pub fn media_path(&self, filename: &str) -> PathBuf {
        self.uploads_dir.join(filename)
    }

    /// Path of a stored thumbnail
    pub fn thumbnail_path(&self, filename: &str) -> PathBuf {
        self.thumbs_dir.join(thumbnail_name(filename))
    }

    /// Save uploaded bytes under a fresh UUID name, keeping the
    /// original extension (lowercased). Returns the stored filename.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let filename = match original_name.rsplit_once('.') {
            Some((_, ext)) => format!("{}.{}", Uuid::new_v4(), ext.to_lowercase()),
            None => Uuid::new_v4().to_string(),
        };

        let path = self.uploads_dir.join(&filename);
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write media file {:?}", path))?;

        Ok(filename)
    }

    /// Generate a thumbnail for a stored image.
    ///
    /// Decoding runs on the blocking pool; image decoding is CPU-bound.
    pub async fn generate_thumbnail(&self, filename: &str) -> Result<()> {
        let source = self.media_path(filename);
        let target = self.thumbnail_path(filename);

        tokio::task::spawn_blocking(move || -> Result<()> {
            let img = image::open(&source)
                .with_context(|| format!("Failed to open image {:?}", source))?;
            let thumb = img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
            thumb
                .save(&target)
                .with_context(|| format!("Failed to save thumbnail {:?}", target))?;
            Ok(())
        })
        .await
        .context("Thumbnail task panicked")??;

        Ok(())
    }

    /// Remove a media file. Missing files are not an error.
    pub async fn remove_media(&self, filename: &str) {
        remove_if_present(&self.media_path(filename)).await;
    }

    /// Remove a thumbnail. Missing files are not an error.
    pub async fn remove_thumbnail(&self, filename: &str) {
        remove_if_present(&self.thumbnail_path(filename)).await;
    }

    /// Bytes stored under the uploads and thumbnails directories.
    ///
    /// Best effort: an unreadable directory reports zero instead of
    /// failing the caller (the admin dashboard tolerates a missing
    /// number).
    pub async fn usage(&self) -> StorageUsage {
        StorageUsage {
            upload_bytes: measured(&self.uploads_dir).await,
            thumb_bytes: measured(&self.thumbs_dir).await,
        }
    }
}

async fn measured(dir: &Path) -> u64 {
    match dir_size(dir).await {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!("Failed to measure dir size: {}", e);
            0
        }
    }
}

async fn remove_if_present(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove {:?}: {}", path, e);
        }
    }
}

async fn dir_size(dir: &Path) -> Result<u64> {
    let mut total = 0u64;
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read dir {:?}", dir))?;

    while let Some(entry) = entries.next_entry().await.context("Failed to read dir entry")? {
        let metadata = entry.metadata().await.context("Failed to stat dir entry")?;
        if metadata.is_file() {
            total += metadata.len();
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (TempDir, MediaStorage) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = MediaStorage::with_dirs(dir.path().join("uploads"), dir.path().join("thumbs"));
        (dir, storage)
    }

    #[tokio::test]
    async fn test_save_keeps_extension_lowercased() {
        let (_dir, storage) = test_storage();
        storage.ensure_dirs().await.unwrap();

        let filename = storage.save("Holiday.JPG", b"not really a jpeg").await.unwrap();

        assert!(filename.ends_with(".jpg"));
        assert!(!filename.contains("Holiday"));
        let stored = tokio::fs::read(storage.media_path(&filename)).await.unwrap();
        assert_eq!(stored, b"not really a jpeg");
    }

    #[tokio::test]
    async fn test_save_unique_names() {
        let (_dir, storage) = test_storage();
        storage.ensure_dirs().await.unwrap();

        let a = storage.save("a.png", b"one").await.unwrap();
        let b = storage.save("a.png", b"two").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_generate_thumbnail() {
        let (_dir, storage) = test_storage();
        storage.ensure_dirs().await.unwrap();

        // A real 2x2 image so the decoder has something to chew on
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200u8, 100, 50]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();

        let filename = storage.save("tiny.png", &bytes).await.unwrap();
        storage.generate_thumbnail(&filename).await.unwrap();

        assert!(storage.thumbnail_path(&filename).exists());
    }

    #[tokio::test]
    async fn test_remove_media_is_silent_on_missing() {
        let (_dir, storage) = test_storage();
        storage.ensure_dirs().await.unwrap();

        // Should not panic or error
        storage.remove_media("never-existed.jpg").await;
    }

    #[tokio::test]
    async fn test_usage_counts_both_dirs() {
        let (_dir, storage) = test_storage();
        storage.ensure_dirs().await.unwrap();

        storage.save("a.bin", &[0u8; 100]).await.unwrap();
        storage.save("b.bin", &[0u8; 50]).await.unwrap();
        tokio::fs::write(storage.thumbnail_path("a.bin"), [0u8; 40])
            .await
            .unwrap();

        let usage = storage.usage().await;
        assert_eq!(usage.upload_bytes, 150);
        assert_eq!(usage.thumb_bytes, 40);
        assert_eq!(usage.total(), 190);
    }

    #[tokio::test]
    async fn test_usage_missing_dirs_is_zero() {
        let storage = MediaStorage::with_dirs("/nonexistent/uploads", "/nonexistent/thumbs");
        assert_eq!(storage.usage().await.total(), 0);
    }
}
