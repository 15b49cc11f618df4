//! Handlers for the `/admin` resource.

use axum::extract::State;
use axum::Json;
use nuance_db::models::user::UserResponse;
use nuance_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users: Vec<UserResponse> = UserRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|u| u.into_response())
        .collect();

    tracing::debug!(admin_id = admin.user_id, count = users.len(), "Listed users");

    Ok(Json(DataResponse { data: users }))
}
