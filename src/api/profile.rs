//! Profile API endpoints
//!
//! - GET /api/v1/profile - Current user with their content counters
//! - PUT /api/v1/profile - Edit name, email, or password

use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::UserResponse;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::services::{listing::UserDashboard, UpdateProfileInput};

/// Request body for profile edits. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile page payload
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub counts: UserDashboard,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/", put(update_profile))
}

/// GET /api/v1/profile
async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let counts = state.listing_service.user_dashboard(&user).await?;
    Ok(Json(ProfileResponse {
        user: user.into(),
        counts,
    }))
}

/// PUT /api/v1/profile
async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state
        .user_service
        .update_profile(
            user.id,
            UpdateProfileInput {
                full_name: body.full_name,
                email: body.email,
                password: body.password,
            },
        )
        .await?;

    Ok(Json(updated.into()))
}
