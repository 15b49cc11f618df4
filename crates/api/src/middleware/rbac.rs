//! Authorization extractors layered on [`AuthUser`].
//!
//! Handlers state their access requirement in the signature: `RequireAuth`
//! for any signed-in learner, `RequireAdmin` for account administration.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nuance_core::error::CoreError;
use nuance_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Any authenticated caller.
pub struct RequireAuth(pub AuthUser);

/// A caller whose token carries the `admin` role.
pub struct RequireAdmin(pub AuthUser);

impl AuthUser {
    /// Fails with 403 unless the caller holds `role`.
    pub fn require_role(self, role: &str) -> Result<Self, AppError> {
        if self.role == role {
            Ok(self)
        } else {
            Err(CoreError::Forbidden(format!("{role} role required")).into())
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        Ok(Self(AuthUser::from_request_parts(parts, state).await?))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(ROLE_ADMIN).map(Self)
    }
}
