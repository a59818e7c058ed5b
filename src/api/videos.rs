//! Video API endpoints
//!
//! Mirrors the photo surface, plus the explicit unlike:
//! - POST /api/v1/videos - Multipart upload (no thumbnail)
//! - GET /api/v1/videos/{id}
//! - DELETE /api/v1/videos/{id}
//! - POST /api/v1/videos/{id}/like - Toggle like
//! - POST /api/v1/videos/{id}/unlike - Always remove
//! - POST /api/v1/videos/{id}/comments
//! - DELETE /api/v1/video-comments/{id}

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::photos::{read_upload_form, CommentRequest, LikeResponse};
use crate::models::{Comment, MediaItem, Video};
use crate::services::VideoDetail;

/// Detail payload plus visibility-scoped neighbors
#[derive(Debug, Serialize)]
pub struct VideoDetailResponse {
    #[serde(flatten)]
    pub detail: VideoDetail,
    pub prev: Option<MediaItem>,
    pub next: Option<MediaItem>,
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/videos/{id}", get(get_video))
}

pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/videos", post(upload_video))
        .route("/videos/{id}", delete(delete_video))
        .route("/videos/{id}/like", post(toggle_like))
        .route("/videos/{id}/unlike", post(unlike))
        .route("/videos/{id}/comments", post(create_comment))
        .route("/video-comments/{id}", delete(delete_comment))
}

/// POST /api/v1/videos
async fn upload_video(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let input = read_upload_form(multipart).await?;
    let video: Video = state.media_service.upload_video(&user, input).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// GET /api/v1/videos/{id}
async fn get_video(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<i64>,
) -> Result<Json<VideoDetailResponse>, ApiError> {
    let viewer = user.as_ref().map(|ext| &ext.0 .0);
    let detail = state.media_service.video_detail(viewer, id).await?;

    let item = MediaItem::Video(detail.video.clone());
    let (prev, next) = state.listing_service.siblings(viewer, &item).await?;

    Ok(Json(VideoDetailResponse { detail, prev, next }))
}

/// DELETE /api/v1/videos/{id}
async fn delete_video(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.media_service.delete_video(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/videos/{id}/like
async fn toggle_like(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<LikeResponse>, ApiError> {
    let liked = state.engagement_service.toggle_video_like(&user, id).await?;
    Ok(Json(LikeResponse { liked }))
}

/// POST /api/v1/videos/{id}/unlike
async fn unlike(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<LikeResponse>, ApiError> {
    state.engagement_service.unlike_video(&user, id).await?;
    Ok(Json(LikeResponse { liked: false }))
}

/// POST /api/v1/videos/{id}/comments
async fn create_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment: Comment = state
        .engagement_service
        .comment_video(&user, id, &body.body)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/v1/video-comments/{id}
async fn delete_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .engagement_service
        .delete_video_comment(&user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
