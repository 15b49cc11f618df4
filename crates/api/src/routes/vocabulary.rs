//! Route definitions for vocabulary sets.

use axum::routing::get;
use axum::Router;

use crate::handlers::vocabulary;
use crate::state::AppState;

/// Routes mounted at `/vocabulary`.
///
/// ```text
/// GET    /sets       -> list_sets (?search=)
/// POST   /sets       -> create_set
/// GET    /sets/{id}  -> get_set
/// PUT    /sets/{id}  -> update_set
/// DELETE /sets/{id}  -> delete_set
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sets",
            get(vocabulary::list_sets).post(vocabulary::create_set),
        )
        .route(
            "/sets/{id}",
            get(vocabulary::get_set)
                .put(vocabulary::update_set)
                .delete(vocabulary::delete_set),
        )
}
