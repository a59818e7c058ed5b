//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the Photoden gallery:
//! - Auth endpoints (register, login, logout, me)
//! - Profile endpoints
//! - Gallery, favorites, uploads, and dashboard listings
//! - Album endpoints
//! - Photo and video endpoints (upload, detail, like, comment)
//! - Admin endpoints (user management, settings)
//! - Static serving of stored media and thumbnails

pub mod admin;
pub mod albums;
pub mod auth;
pub mod common;
pub mod gallery;
pub mod middleware;
pub mod photos;
pub mod profile;
pub mod videos;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Extension, Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use middleware::AuthenticatedUser;
pub use middleware::{ApiError, AppState};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (need admin role)
    let admin_routes = Router::new()
        .nest("/admin", admin::router())
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Protected routes (need auth but not admin)
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/profile", profile::router())
        .merge(gallery::router())
        .merge(albums::protected_router())
        .merge(photos::protected_router())
        .merge(videos::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public browsing routes; a session is picked up when present so
    // owners see their private items
    let browse_routes = Router::new()
        .merge(albums::public_router())
        .merge(photos::public_router())
        .merge(videos::public_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_auth,
        ));

    Router::new()
        .nest("/auth", auth::public_router())
        .merge(browse_routes)
        .merge(admin_routes)
        .merge(protected_routes)
}

/// Landing route: basic service info and whether the caller is signed in
async fn root(user: Option<Extension<AuthenticatedUser>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": user.is_some(),
    }))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    // Uploads may exceed the 2 MB default body limit
    let body_limit = state.upload_config.max_file_size as usize + 64 * 1024;

    let landing = Router::new().route("/", get(root)).route_layer(
        axum_middleware::from_fn_with_state(state.clone(), middleware::optional_auth),
    );

    Router::new()
        .merge(landing)
        .nest("/api/v1", build_api_router(state.clone()))
        .nest_service("/uploads", ServeDir::new(&state.upload_config.path))
        .nest_service("/thumbs", ServeDir::new(&state.upload_config.thumbs_path))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
