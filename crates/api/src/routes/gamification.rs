//! Route definitions for practice gamification.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::gamification;
use crate::state::AppState;

/// Routes mounted at `/gamification`.
///
/// ```text
/// GET  /          -> get_gamification
/// POST /practice  -> record_practice
/// POST /reset     -> reset_gamification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gamification::get_gamification))
        .route("/practice", post(gamification::record_practice))
        .route("/reset", post(gamification::reset_gamification))
}
