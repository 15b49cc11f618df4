//! Handlers for the `/auth` resource (register, login, refresh, logout, me).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use nuance_core::error::CoreError;
use nuance_core::roles::DEFAULT_ROLE_ID;
use nuance_db::models::user::{CreateUser, User, UserResponse};
use nuance_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{check_password_length, hash_password, verify_password};
use crate::auth::refresh::{self, RefreshToken};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins that lock an account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

const LOCK_MINUTES: i32 = 15;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
}

/// `login` is a username or an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by register, login, and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

fn forbidden(msg: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.to_string()))
}

/// POST /api/v1/auth/register
///
/// Creates a regular account and signs it in.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(input) = payload?;
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    check_password_length(&input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash,
            role_id: DEFAULT_ROLE_ID,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(sign_in(&state, user).await?)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(input) = payload?;
    let bad_credentials = || unauthorized("Invalid username or password");

    let user = UserRepo::find_by_login(&state.pool, input.login.trim())
        .await?
        .ok_or_else(bad_credentials)?;

    if !user.is_active {
        return Err(forbidden("Account is deactivated"));
    }
    if user.is_locked_at(Utc::now()) {
        return Err(forbidden("Account is temporarily locked. Try again later."));
    }

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("password verification failed: {e}")))?;

    if !matches {
        let locked =
            UserRepo::record_failed_login(&state.pool, user.id, MAX_FAILED_ATTEMPTS, LOCK_MINUTES)
                .await?;
        if locked {
            tracing::warn!(user_id = user.id, "Account locked after repeated failed logins");
        }
        return Err(bad_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    Ok(Json(sign_in(&state, user).await?))
}

/// POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. Each token works once.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(input) = payload?;

    let session = SessionRepo::consume(&state.pool, &refresh::digest(&input.refresh_token))
        .await?
        .ok_or_else(|| unauthorized("Invalid or expired refresh token"))?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| unauthorized("User no longer exists"))?;
    if !user.is_active {
        return Err(forbidden("Account is deactivated"));
    }

    Ok(Json(sign_in(&state, user).await?))
}

/// POST /api/v1/auth/logout
///
/// Revokes all of the caller's refresh sessions.
pub async fn logout(State(state): State<AppState>, caller: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, caller.user_id).await?;
    tracing::info!(user_id = caller.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, caller.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: caller.user_id,
        })?;

    Ok(Json(DataResponse {
        data: user.into_response(),
    }))
}

/// Issue an access token and a new refresh session.
async fn sign_in(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = jwt
        .issue(user.id, &user.role)
        .map_err(|e| AppError::InternalError(format!("token signing failed: {e}")))?;

    let refresh_token = RefreshToken::generate();
    SessionRepo::create(
        &state.pool,
        user.id,
        &refresh_token.hash,
        jwt.refresh_expires_at(),
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_token.plaintext,
        expires_in: jwt.access_token_expiry_secs(),
        user: user.into_response(),
    })
}
