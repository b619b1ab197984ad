//! Category routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use bella_store_core::CategoryId;

use crate::db::categories::{CategoryRepository, CategoryUpdate, NewCategory};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::success;
use crate::state::AppState;

/// GET /api/categories
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool()).list_active().await?;
    Ok(success(categories))
}

/// GET /api/categories/{slug}
///
/// # Errors
///
/// Returns `AppError::NotFound` if no active category has this slug.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    Ok(success(category))
}

/// Body for creating a category (admin).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// POST /api/categories (admin)
///
/// # Errors
///
/// Returns `AppError::BadRequest` for missing fields, 409 for duplicate slugs.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() || body.slug.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and slug are required".to_string(),
        ));
    }

    let category = CategoryRepository::new(state.pool())
        .create(&NewCategory {
            name: body.name,
            slug: body.slug,
            description: body.description,
            image_url: body.image_url,
        })
        .await?;

    Ok((StatusCode::CREATED, success(category)))
}

/// Body for updating a category (admin). Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// PUT /api/categories/{id} (admin)
///
/// # Errors
///
/// Returns `AppError::NotFound` if the category doesn't exist.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .update(
            id,
            &CategoryUpdate {
                name: body.name,
                description: body.description,
                image_url: body.image_url,
                is_active: body.is_active,
            },
        )
        .await?;

    Ok(success(category))
}

/// DELETE /api/categories/{id} (admin) - soft delete.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the category doesn't exist.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    CategoryRepository::new(state.pool()).deactivate(id).await?;
    Ok(success(()))
}
