//! Album API endpoints
//!
//! - GET /api/v1/albums - Visible albums, paginated
//! - POST /api/v1/albums - Create an album
//! - GET /api/v1/albums/{id} - One album and a page of its items
//! - DELETE /api/v1/albums/{id} - Delete an album and its contents
//! - GET /api/v1/my-albums - The caller's own albums

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::PageQuery;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Album, AlbumVisibility, ListParams, MediaItem, PagedResult};
use crate::services::{ALBUM_PAGE_SIZE, GALLERY_PAGE_SIZE};

/// Request body for album creation
#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility: Option<AlbumVisibility>,
}

/// One album with a page of its contents
#[derive(Debug, Serialize)]
pub struct AlbumDetailResponse {
    pub album: Album,
    pub items: PagedResult<MediaItem>,
}

/// Routes readable without a session (visibility still applies)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/albums", get(list_albums))
        .route("/albums/{id}", get(get_album))
}

/// Routes that require a session
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/albums", post(create_album))
        .route("/albums/{id}", delete(delete_album))
        .route("/my-albums", get(my_albums))
}

/// GET /api/v1/albums
async fn list_albums(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<Album>>, ApiError> {
    let viewer = user.as_ref().map(|ext| &ext.0 .0);
    let params = ListParams::new(query.page, ALBUM_PAGE_SIZE);
    let page = state.album_service.list_albums(viewer, params).await?;
    Ok(Json(page))
}

/// POST /api/v1/albums
async fn create_album(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateAlbumRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let album = state
        .album_service
        .create_album(
            &user,
            &body.title,
            &body.description,
            body.visibility.unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(album)))
}

/// GET /api/v1/albums/{id}
async fn get_album(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<AlbumDetailResponse>, ApiError> {
    let viewer = user.as_ref().map(|ext| &ext.0 .0);
    let params = ListParams::new(query.page, GALLERY_PAGE_SIZE);
    let (album, items) = state.album_service.album_items(viewer, id, params).await?;
    Ok(Json(AlbumDetailResponse { album, items }))
}

/// DELETE /api/v1/albums/{id}
async fn delete_album(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.album_service.delete_album(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/my-albums
async fn my_albums(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<Album>>, ApiError> {
    let params = ListParams::new(query.page, GALLERY_PAGE_SIZE);
    let page = state.album_service.my_albums(&user, params).await?;
    Ok(Json(page))
}
