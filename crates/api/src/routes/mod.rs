pub mod admin;
pub mod auth;
pub mod gamification;
pub mod health;
pub mod vocabulary;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                  register (public)
/// /auth/login                     login (public)
/// /auth/refresh                   refresh (public)
/// /auth/logout                    logout (auth)
/// /auth/me                        current user (auth)
///
/// /admin/users                    list users (admin)
///
/// /vocabulary/sets                list, create (auth)
/// /vocabulary/sets/{id}           get, update, delete (auth, owner only)
///
/// /gamification                   current progress or null (auth)
/// /gamification/practice          record a practice attempt (auth)
/// /gamification/reset             delete progress (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/vocabulary", vocabulary::router())
        .nest("/gamification", gamification::router())
}
