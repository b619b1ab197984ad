//! Order routes: placement, history, and back-office status updates.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use bella_store_core::{AddressId, OrderId, OrderStatus, PaymentMethod, PaymentStatus};

use crate::db::addresses::AddressRepository;
use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::routes::{success, success_with_message};
use crate::services::checkout::{self, CheckoutRequest};
use crate::state::AppState;

/// Body for placing an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub address_id: AddressId,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// POST /api/orders
///
/// Places an order from the user's current cart. The address must belong to
/// the user; that is checked here, before the checkout transaction runs.
///
/// # Errors
///
/// Returns 400 for an empty cart or insufficient stock, 404 for a foreign
/// or unknown address, 500 for database failures.
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse> {
    AddressRepository::new(state.pool())
        .get_owned(body.address_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Address".to_string()))?;

    let order = checkout::place_order(
        state.pool(),
        user.id,
        &CheckoutRequest {
            address_id: body.address_id,
            payment_method: body.payment_method,
            notes: body.notes,
        },
        state.shipping(),
    )
    .await?;

    tracing::info!(
        order_number = %order.order.order_number,
        total = %order.order.total,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        success_with_message("Order placed", order),
    ))
}

/// GET /api/orders
///
/// A customer sees their own history; an admin sees every order.
///
/// # Errors
///
/// Returns `AppError` if a query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let orders = if user.role.is_admin() {
        repo.list_all().await?
    } else {
        repo.list_for_user(user.id).await?
    };

    Ok(success(orders))
}

/// GET /api/orders/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order doesn't exist or belongs to
/// another user (admins can read any order).
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let order = if user.role.is_admin() {
        repo.get(id).await?
    } else {
        repo.get_owned(id, user.id).await?
    };

    let order = order.ok_or_else(|| AppError::NotFound("Order".to_string()))?;
    Ok(success(order))
}

/// Body for updating an order's fulfillment status (admin).
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status (admin)
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order doesn't exist.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .update_status(id, body.status)
        .await?;

    Ok(success(order))
}

/// Body for updating an order's payment state (admin).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
}

/// PUT /api/orders/{id}/payment (admin)
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order doesn't exist.
pub async fn update_payment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .update_payment(id, body.payment_status, body.payment_id.as_deref())
        .await?;

    Ok(success(order))
}
