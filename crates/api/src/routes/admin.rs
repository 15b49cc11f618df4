//! Route definitions for the `/admin` resource (admin role only).

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /users -> list_users
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(admin::list_users))
}
