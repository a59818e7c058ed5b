//! Photoden - A lightweight web media gallery

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photoden::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxAlbumRepository, SqlxCommentRepository, SqlxLikeRepository, SqlxPhotoRepository,
            SqlxSessionRepository, SqlxTagRepository, SqlxUserRepository, SqlxVideoRepository,
        },
    },
    services::{
        AlbumService, EngagementService, ListingService, MediaService, MediaStorage, UserService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoden=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Photoden gallery...");

    // Load configuration (file values can be overridden via PHOTODEN_* env vars)
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Prepare media storage directories
    let storage = MediaStorage::new(&config.upload);
    storage.ensure_dirs().await?;
    tracing::info!("Media storage ready");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let album_repo = SqlxAlbumRepository::boxed(pool.clone());
    let photo_repo = SqlxPhotoRepository::boxed(pool.clone());
    let video_repo = SqlxVideoRepository::boxed(pool.clone());
    let tag_repo = SqlxTagRepository::boxed(pool.clone());
    let like_repo = SqlxLikeRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo.clone(), session_repo));
    let album_service = Arc::new(AlbumService::new(
        album_repo.clone(),
        photo_repo.clone(),
        video_repo.clone(),
        storage.clone(),
    ));
    let media_service = Arc::new(MediaService::new(
        photo_repo.clone(),
        video_repo.clone(),
        album_repo.clone(),
        tag_repo.clone(),
        like_repo.clone(),
        comment_repo.clone(),
        storage.clone(),
        config.upload.max_file_size,
    ));
    let engagement_service = Arc::new(EngagementService::new(
        like_repo.clone(),
        comment_repo,
        photo_repo.clone(),
        video_repo.clone(),
    ));
    let listing_service = Arc::new(ListingService::new(
        photo_repo,
        video_repo,
        album_repo,
        user_repo,
        like_repo,
        storage,
    ));

    // Build application state
    let state = AppState {
        user_service,
        album_service,
        media_service,
        engagement_service,
        listing_service,
        upload_config: Arc::new(config.upload.clone()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
