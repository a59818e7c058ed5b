//! Gallery API endpoints
//!
//! - GET /api/v1/gallery - Merged photo/video stream with search
//! - GET /api/v1/favorites - Items the user has liked
//! - GET /api/v1/my-uploads - The user's own uploads
//! - GET /api/v1/dashboard - Role-routed counters

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;

use crate::api::common::{GalleryQuery, PageQuery};
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{ListParams, MediaItem, PagedResult};
use crate::services::{
    listing::{AdminDashboard, GalleryPage, MyUploads, UserDashboard},
    GALLERY_PAGE_SIZE,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(gallery))
        .route("/favorites", get(favorites))
        .route("/my-uploads", get(my_uploads))
        .route("/dashboard", get(dashboard))
}

/// GET /api/v1/gallery
async fn gallery(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<GalleryPage>, ApiError> {
    let params = ListParams::new(query.page, GALLERY_PAGE_SIZE);
    let page = state
        .listing_service
        .gallery(Some(&user), query.q.as_deref(), params)
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/favorites
async fn favorites(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<MediaItem>>, ApiError> {
    let params = ListParams::new(query.page, GALLERY_PAGE_SIZE);
    let page = state.listing_service.favorites(&user, params).await?;
    Ok(Json(page))
}

/// GET /api/v1/my-uploads
async fn my_uploads(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MyUploads>, ApiError> {
    let params = ListParams::new(query.page, GALLERY_PAGE_SIZE);
    let page = state.listing_service.my_uploads(&user, params).await?;
    Ok(Json(page))
}

/// Dashboard payload, shaped by the caller's role
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DashboardResponse {
    Admin(AdminDashboard),
    User(UserDashboard),
}

/// GET /api/v1/dashboard
///
/// Admins get site-wide counters, everyone else their own.
async fn dashboard(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let response = if user.is_admin() {
        DashboardResponse::Admin(state.listing_service.admin_dashboard().await?)
    } else {
        DashboardResponse::User(state.listing_service.user_dashboard(&user).await?)
    };
    Ok(Json(response))
}
