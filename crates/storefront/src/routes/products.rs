//! Product catalog routes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use bella_store_core::{CategoryId, Price, ProductId};

use crate::db::products::{
    NewProduct, Page, ProductFilter, ProductRepository, ProductSort, ProductUpdate,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::ProductWithCategory;
use crate::routes::success;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub material: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort: ProductSort,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Pagination block included in listing responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Listing response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub products: Vec<ProductWithCategory>,
    pub pagination: Pagination,
}

/// GET /api/products
///
/// # Errors
///
/// Returns `AppError` if the listing queries fail.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = Page::clamped(query.page, query.limit);
    let filter = ProductFilter {
        category: query.category,
        material: query.material,
        search: query.search,
        min_price: query.min_price.map(Price::new),
        max_price: query.max_price.map(Price::new),
        featured: query.featured,
        sort: query.sort,
    };

    let (products, total) = ProductRepository::new(state.pool())
        .list(&filter, page)
        .await?;

    Ok(success(ProductList {
        products,
        pagination: Pagination {
            page: page.page,
            limit: page.limit,
            total,
            total_pages: page.total_pages(total),
        },
    }))
}

/// GET /api/products/{slug}
///
/// # Errors
///
/// Returns `AppError::NotFound` if no active product has this slug.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    Ok(success(product))
}

/// Body for creating a product (admin).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Minor currency units.
    pub price: i64,
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<String>,
    pub material: Option<String>,
    pub category_id: CategoryId,
    #[serde(default)]
    pub is_featured: bool,
}

/// POST /api/products (admin)
///
/// # Errors
///
/// Returns `AppError::BadRequest` for invalid fields, 409 for duplicate slugs.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() || body.slug.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and slug are required".to_string(),
        ));
    }
    if body.price < 0 || body.stock < 0 {
        return Err(AppError::BadRequest(
            "Price and stock must be non-negative".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: body.name,
            slug: body.slug,
            description: body.description,
            price: Price::new(body.price),
            stock: body.stock,
            images: body.images,
            material: body.material,
            category_id: body.category_id,
            is_featured: body.is_featured,
        })
        .await?;

    Ok((StatusCode::CREATED, success(product)))
}

/// Body for updating a product (admin). Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Minor currency units.
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub material: Option<String>,
    pub category_id: Option<CategoryId>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// PUT /api/products/{id} (admin)
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product doesn't exist.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse> {
    if body.price.is_some_and(|p| p < 0) || body.stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest(
            "Price and stock must be non-negative".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .update(
            id,
            &ProductUpdate {
                name: body.name,
                description: body.description,
                price: body.price.map(Price::new),
                stock: body.stock,
                images: body.images,
                material: body.material,
                category_id: body.category_id,
                is_featured: body.is_featured,
                is_active: body.is_active,
            },
        )
        .await?;

    Ok(success(product))
}

/// DELETE /api/products/{id} (admin) - soft delete.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product doesn't exist.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    ProductRepository::new(state.pool()).deactivate(id).await?;
    Ok(success(()))
}
