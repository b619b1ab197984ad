//! Auth routes: register, login, logout, current user.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::{success, success_with_message};
use crate::services::auth::{self, Registration};
use crate::state::AppState;

/// Body for registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// POST /api/auth/register
///
/// Creates the account and signs the new user in.
///
/// # Errors
///
/// Returns 400 for invalid email or weak password, 409 if the email is
/// already registered.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = auth::register(
        state.pool(),
        &Registration {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
        },
    )
    .await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, Some(&user.email));

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        success_with_message("Account created", user),
    ))
}

/// Body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// # Errors
///
/// Returns 401 for bad credentials or deactivated accounts.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = auth::login(state.pool(), &body.email, &body.password).await?;

    // Rotate the session ID on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, Some(&user.email));

    Ok(success_with_message("Signed in", user))
}

/// POST /api/auth/logout
///
/// # Errors
///
/// Returns 500 if the session cannot be destroyed.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(success_with_message("Signed out", ()))
}

/// GET /api/auth/me
///
/// # Errors
///
/// Returns 404 if the session references a user that no longer exists.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = crate::db::users::UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    Ok(success(user))
}
