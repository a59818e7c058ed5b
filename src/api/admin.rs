//! Admin API endpoints
//!
//! Handles HTTP requests for admin management:
//! - GET /api/v1/admin/users - List all accounts
//! - PUT /api/v1/admin/users/{id}/role - Assign a role
//! - GET /api/v1/admin/settings - Deployment settings and storage use

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::common::UserResponse;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::UserRole;
use crate::services::{listing::AdminDashboard, ALLOWED_EXTENSIONS};

/// Request body for role assignment
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Deployment settings shown on the admin settings page
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
    #[serde(flatten)]
    pub stats: AdminDashboard,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}/role", put(set_role))
        .route("/settings", get(get_settings))
}

/// GET /api/v1/admin/users
async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// A malformed role value is a 400; self-demotion is a 403.
async fn set_role(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role = UserRole::from_str(body.role.trim())
        .map_err(|_| ApiError::bad_request(format!("Invalid role: {}", body.role)))?;

    let updated = state.user_service.set_role(&actor, id, role).await?;
    Ok(Json(updated.into()))
}

/// GET /api/v1/admin/settings
async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>, ApiError> {
    let stats = state.listing_service.admin_dashboard().await?;

    Ok(Json(SettingsResponse {
        max_file_size: state.upload_config.max_file_size,
        allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        stats,
    }))
}
