//! Account routes: profile, password, and addresses.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;

use bella_store_core::AddressId;

use crate::db::addresses::{AddressFields, AddressRepository};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::middleware::auth::set_current_user;
use crate::models::CurrentUser;
use crate::routes::{success, success_with_message};
use crate::services::auth;
use crate::state::AppState;

/// Body for updating the profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// PUT /api/account/profile
///
/// # Errors
///
/// Returns `AppError::BadRequest` for empty names.
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let first_name = body.first_name.trim();
    let last_name = body.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::BadRequest(
            "First and last name are required".to_string(),
        ));
    }

    let user = UserRepository::new(state.pool())
        .update_profile(current.id, first_name, last_name, body.phone.as_deref())
        .await?;

    // Keep the session copy in sync.
    set_current_user(&session, &CurrentUser::from(&user))
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(success(user))
}

/// Body for changing the password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// PUT /api/account/password
///
/// # Errors
///
/// Returns 401 if the current password is wrong, 400 if the new one is
/// too weak.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    auth::change_password(
        state.pool(),
        current.id,
        &body.current_password,
        &body.new_password,
    )
    .await?;

    Ok(success_with_message("Password changed", ()))
}

/// GET /api/account/addresses
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let addresses = AddressRepository::new(state.pool()).list(user.id).await?;
    Ok(success(addresses))
}

/// Body for creating or replacing an address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub department: String,
    pub postal_code: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressRequest {
    fn into_fields(self) -> Result<AddressFields> {
        let full_name = self.full_name.trim().to_string();
        let street = self.street.trim().to_string();
        let city = self.city.trim().to_string();
        if full_name.is_empty() || street.is_empty() || city.is_empty() {
            return Err(AppError::BadRequest(
                "Full name, street, and city are required".to_string(),
            ));
        }

        Ok(AddressFields {
            full_name,
            phone: self.phone,
            street,
            city,
            department: self.department,
            postal_code: self.postal_code,
            is_default: self.is_default,
        })
    }
}

/// POST /api/account/addresses
///
/// # Errors
///
/// Returns `AppError::BadRequest` for missing fields.
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddressRequest>,
) -> Result<impl IntoResponse> {
    let fields = body.into_fields()?;
    let address = AddressRepository::new(state.pool())
        .create(user.id, &fields)
        .await?;

    Ok((StatusCode::CREATED, success(address)))
}

/// PUT /api/account/addresses/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the address isn't this user's.
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
    Json(body): Json<AddressRequest>,
) -> Result<impl IntoResponse> {
    let fields = body.into_fields()?;
    let address = AddressRepository::new(state.pool())
        .update(id, user.id, &fields)
        .await?;

    Ok(success(address))
}

/// DELETE /api/account/addresses/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the address isn't this user's.
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<impl IntoResponse> {
    let deleted = AddressRepository::new(state.pool())
        .delete(id, user.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Address".to_string()));
    }
    Ok(success_with_message("Address deleted", ()))
}
