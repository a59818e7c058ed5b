//! Photo API endpoints
//!
//! - POST /api/v1/photos - Multipart upload
//! - GET /api/v1/photos/{id} - Detail with tags, likes, comments, siblings
//! - DELETE /api/v1/photos/{id}
//! - POST /api/v1/photos/{id}/like - Toggle like
//! - POST /api/v1/photos/{id}/comments
//! - DELETE /api/v1/comments/{id}

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Comment, MediaItem, Photo};
use crate::services::{PhotoDetail, UploadInput};

/// Request body for comments
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

/// Resulting like state after a toggle
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

/// Detail payload plus visibility-scoped neighbors
#[derive(Debug, Serialize)]
pub struct PhotoDetailResponse {
    #[serde(flatten)]
    pub detail: PhotoDetail,
    pub prev: Option<MediaItem>,
    pub next: Option<MediaItem>,
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/photos/{id}", get(get_photo))
}

pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/photos", post(upload_photo))
        .route("/photos/{id}", delete(delete_photo))
        .route("/photos/{id}/like", post(toggle_like))
        .route("/photos/{id}/comments", post(create_comment))
        .route("/comments/{id}", delete(delete_comment))
}

/// Read the shared upload form: `file`, `album_id`, `caption`, `tags`.
pub(crate) async fn read_upload_form(mut multipart: Multipart) -> Result<UploadInput, ApiError> {
    let mut album_id = None;
    let mut original_name = None;
    let mut data = None;
    let mut caption = String::new();
    let mut tag_text = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                original_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;
                data = Some(bytes.to_vec());
            }
            "album_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read field: {}", e)))?;
                album_id = Some(
                    text.trim()
                        .parse::<i64>()
                        .map_err(|_| ApiError::validation_error("Invalid album id"))?,
                );
            }
            "caption" => {
                caption = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read field: {}", e)))?;
            }
            "tags" => {
                tag_text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read field: {}", e)))?;
            }
            _ => {}
        }
    }

    Ok(UploadInput {
        album_id: album_id.ok_or_else(|| ApiError::validation_error("Missing album_id"))?,
        original_name: original_name
            .ok_or_else(|| ApiError::validation_error("Missing file"))?,
        data: data.ok_or_else(|| ApiError::validation_error("Missing file"))?,
        caption,
        tag_text,
    })
}

/// POST /api/v1/photos
async fn upload_photo(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let input = read_upload_form(multipart).await?;
    let photo: Photo = state.media_service.upload_photo(&user, input).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// GET /api/v1/photos/{id}
async fn get_photo(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<i64>,
) -> Result<Json<PhotoDetailResponse>, ApiError> {
    let viewer = user.as_ref().map(|ext| &ext.0 .0);
    let detail = state.media_service.photo_detail(viewer, id).await?;

    let item = MediaItem::Photo(detail.photo.clone());
    let (prev, next) = state.listing_service.siblings(viewer, &item).await?;

    Ok(Json(PhotoDetailResponse { detail, prev, next }))
}

/// DELETE /api/v1/photos/{id}
async fn delete_photo(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.media_service.delete_photo(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/photos/{id}/like
async fn toggle_like(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<LikeResponse>, ApiError> {
    let liked = state.engagement_service.toggle_photo_like(&user, id).await?;
    Ok(Json(LikeResponse { liked }))
}

/// POST /api/v1/photos/{id}/comments
async fn create_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment: Comment = state
        .engagement_service
        .comment_photo(&user, id, &body.body)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/v1/comments/{id}
async fn delete_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .engagement_service
        .delete_photo_comment(&user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
